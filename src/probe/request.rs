//! JSON-RPC request bodies for each probe kind

use crate::types::ProbeKind;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Object ids requested per `sui_multiGetObjects` probe
pub const OBJECT_IDS_PER_REQUEST: usize = 20;

/// Package whose auction entry function the transaction query filters on
pub const AUCTION_PACKAGE_ID: &str = "0x7bfe75f51565a2e03e169c85a50c490ee707692a14d5417e2b97740da0d48627";
pub const AUCTION_MODULE: &str = "auction";
pub const AUCTION_FUNCTION: &str = "admin_creates_auction";

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC error {}: {}", self.code, self.message)
    }
}

/// Build the request body for one probe
pub fn build_request(kind: ProbeKind, id: u64) -> JsonRpcRequest {
    let params = match kind {
        ProbeKind::MultiGetObjects => {
            let ids: Vec<String> = (0..OBJECT_IDS_PER_REQUEST).map(|_| random_object_id()).collect();
            json!([
                ids,
                { "showContent": true, "showType": true, "showDisplay": true }
            ])
        }
        ProbeKind::QueryTransactionBlocks => json!([
            {
                "filter": {
                    "MoveFunction": {
                        "package": AUCTION_PACKAGE_ID,
                        "module": AUCTION_MODULE,
                        "function": AUCTION_FUNCTION
                    }
                },
                "options": { "showEffects": true, "showObjectChanges": true, "showInput": true }
            },
            null,
            null,
            false
        ]),
    };

    JsonRpcRequest {
        jsonrpc: "2.0",
        id,
        method: kind.rpc_method(),
        params,
    }
}

/// Random 32-byte Sui address as 0x-prefixed lowercase hex
///
/// Random ids defeat response caching on the node side.
pub fn random_object_id() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    let mut id = String::with_capacity(66);
    id.push_str("0x");
    for byte in bytes {
        id.push_str(&format!("{:02x}", byte));
    }
    id
}
