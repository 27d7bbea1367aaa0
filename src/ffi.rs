//! FFI Layer
//!
//! All C-ABI exports are defined here. Every function follows the same
//! pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `assets_free_string`)
//!
//! Error handling: All functions return JSON with a `success` field.
//! On error, `success: false` and the `error` object is populated.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::AssetsError;
use crate::log_error;
use crate::types::*;
use crate::utils::network_config::NetworkConfig;

const MODULE: &str = "ffi";

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any assets_* function
///
/// # Safety
/// The pointer must have been returned by an assets_* function
#[unsafe(no_mangle)]
pub extern "C" fn assets_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Copy a C string into an owned Rust string, or build the error JSON
fn parse_input(input: *const c_char) -> Result<String, *mut c_char> {
    if input.is_null() {
        return Err(error_response(AssetsError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    match c_str.to_str() {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(error_response(AssetsError::invalid_input("Invalid UTF-8 string"))),
    }
}

fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    string_to_ptr(ApiResponse::ok(data).to_json())
}

fn error_response(error: AssetsError) -> *mut c_char {
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => CString::new(
            r#"{"success":false,"error":{"code":"internal","message":"String conversion failed"}}"#,
        )
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut()),
    }
}

// =============================================================================
// Asset List
// =============================================================================

/// Fetch the ordered asset list for an account
///
/// # Input
/// ```json
/// { "account": "4Qkev8...", "network": "devnet", "endpoint": null }
/// ```
/// `account` omitted or null means disconnected; no RPC call is made.
///
/// # Output
/// ```json
/// {
///   "success": true,
///   "data": {
///     "network": "devnet",
///     "endpoint": "https://api.devnet.solana.com",
///     "connected": true,
///     "state": "loaded",
///     "assets": [{ "identifier": "SOL", "symbol": "SOL", "amount": 2.5 }, ...]
///   }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn assets_fetch_list(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    let request: AssetListRequest = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(e) => return error_response(AssetsError::parse_error(format!("Invalid JSON: {}", e))),
    };

    let config = match NetworkConfig::from_env() {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            log_error!(MODULE, "Runtime creation failed", error = e);
            return error_response(AssetsError::internal(format!("Runtime error: {}", e)));
        }
    };

    match rt.block_on(crate::api::fetch_assets(&request, &config)) {
        Ok(response) => success_response(response),
        Err(e) => error_response(e),
    }
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Shorten an address for the wallet button
///
/// # Input
/// ```json
/// { "address": "4Qkev8aNZcqFNSRhQzwyLMFSsi94jHqE8WNVTJzTP99F" }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": "4Qke...P99F" }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn assets_short_address(input: *const c_char) -> *mut c_char {
    #[derive(serde::Deserialize)]
    struct ShortAddressRequest {
        address: String,
    }

    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    match serde_json::from_str::<ShortAddressRequest>(&json_str) {
        Ok(request) => success_response(crate::display::short_address(&request.address)),
        Err(e) => error_response(AssetsError::parse_error(format!("Invalid JSON: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(func: extern "C" fn(*const c_char) -> *mut c_char, input: &str) -> serde_json::Value {
        let c_input = CString::new(input).unwrap();
        let result = func(c_input.as_ptr());
        let output = unsafe { CStr::from_ptr(result) }.to_string_lossy().into_owned();
        assets_free_string(result);
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn test_fetch_list_disconnected() {
        let json = call(assets_fetch_list, r#"{"network":"mainnet-beta"}"#);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["state"], "disconnected");
        assert_eq!(json["data"]["connected"], false);
        assert_eq!(json["data"]["network"], "mainnet-beta");
    }

    #[test]
    fn test_fetch_list_invalid_account() {
        let json = call(assets_fetch_list, r#"{"account":"not-base58!"}"#);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "invalid_address");
    }

    #[test]
    fn test_fetch_list_invalid_json() {
        let json = call(assets_fetch_list, "{");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "parse_error");
    }

    #[test]
    fn test_null_input() {
        let result = assets_fetch_list(std::ptr::null());
        let output = unsafe { CStr::from_ptr(result) }.to_string_lossy().into_owned();
        assets_free_string(result);
        assert!(output.contains("invalid_input"));
    }

    #[test]
    fn test_short_address() {
        let json = call(
            assets_short_address,
            r#"{"address":"4Qkev8aNZcqFNSRhQzwyLMFSsi94jHqE8WNVTJzTP99F"}"#,
        );
        assert_eq!(json["data"], "4Qke...P99F");
    }

    #[test]
    fn test_free_null_is_noop() {
        assets_free_string(std::ptr::null_mut());
    }
}
