//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use pm2_manager_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SYSTEM_ERROR: i32 = 5002;
    pub const PARSE_ERROR: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Validation(_) | AppError::Domain(_) => code::VALIDATION_ERROR,
        AppError::NotFound(_) => code::NOT_FOUND,
        AppError::CommandFailed(_) | AppError::Execution(_) => code::SYSTEM_ERROR,
        AppError::Parse(_) | AppError::Serialization(_) => code::PARSE_ERROR,
        AppError::Internal(_) => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm2_manager_core::port::ExecutionError;

    #[test]
    fn test_error_codes() {
        let err = to_rpc_error(AppError::Parse("bad json".to_string()));
        assert_eq!(err.code(), code::PARSE_ERROR);
        assert!(err.message().contains("bad json"));

        let err = to_rpc_error(AppError::Execution(ExecutionError::Timeout(30_000)));
        assert_eq!(err.code(), code::SYSTEM_ERROR);

        let err = to_rpc_error(AppError::Validation("lines".to_string()));
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        let err = to_rpc_error(AppError::NotFound("process ghost".to_string()));
        assert_eq!(err.code(), code::NOT_FOUND);
        assert!(err.message().contains("process ghost"));
    }
}
