//! Supported JSON-RPC methods.
//!
//! Two methods, one per matrix operation. Anything else is answered with
//! "method not found".

use std::collections::HashMap;
use std::sync::LazyLock;

/// Method name for row submission
pub const SEND_ROW: &str = "matrix_sendRow";
/// Method name for matrix queries
pub const QUERY: &str = "matrix_query";

/// Matrix operation a method maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMethod {
    SendRow,
    Query,
}

/// Method metadata
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Full method name (e.g., "matrix_sendRow")
    pub name: &'static str,
    pub method: MatrixMethod,
    /// Positional parameter names, in order
    pub params: &'static [&'static str],
    /// Does this method mutate the matrix?
    pub is_write: bool,
    /// Brief description
    pub description: &'static str,
}

/// Method registry - all supported methods with metadata
pub static METHOD_REGISTRY: LazyLock<HashMap<&'static str, MethodInfo>> = LazyLock::new(|| {
    let methods = [
        MethodInfo {
            name: SEND_ROW,
            method: MatrixMethod::SendRow,
            params: &["client_id", "values", "row_index"],
            is_write: true,
            description: "Append one row to the shared matrix",
        },
        MethodInfo {
            name: QUERY,
            method: MatrixMethod::Query,
            params: &["client_id", "query_type"],
            is_write: false,
            description: "Row count (1), rank (2) or determinant (3) of the matrix",
        },
    ];

    methods.into_iter().map(|m| (m.name, m)).collect()
});

/// Look up method metadata
pub fn get_method_info(method: &str) -> Option<&'static MethodInfo> {
    METHOD_REGISTRY.get(method)
}

/// Check if method is supported
pub fn is_method_supported(method: &str) -> bool {
    METHOD_REGISTRY.contains_key(method)
}

/// Check if method is a write operation
pub fn is_write_method(method: &str) -> bool {
    METHOD_REGISTRY
        .get(method)
        .map(|m| m.is_write)
        .unwrap_or(false)
}
