//! Crypto-adjacent builtins (§4.B "crypto"): identifiers and encodings only,
//! never host entropy or key material beyond what `uuid`/`base64` expose.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::value::Value;

use super::super::{ArgType, Category, FunctionRegistry, SafeFunction};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(SafeFunction::new("Crypto.uuid", Category::Crypto, 0, Some(0), |_args| {
        Ok(Value::String(uuid::Uuid::new_v4().to_string()))
    }));

    registry.register(
        SafeFunction::new("Crypto.base64Encode", Category::Crypto, 1, Some(1), |args| {
            let text = args[0].as_str().ok_or_else(|| format!("expected a string, got {}", args[0].type_name()))?;
            Ok(Value::String(BASE64.encode(text.as_bytes())))
        })
        .with_type_checks(vec![ArgType::String]),
    );

    registry.register(
        SafeFunction::new("Crypto.base64Decode", Category::Crypto, 1, Some(1), |args| {
            let text = args[0].as_str().ok_or_else(|| format!("expected a string, got {}", args[0].type_name()))?;
            let decoded = BASE64
                .decode(text)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_default();
            Ok(Value::String(decoded))
        })
        .with_type_checks(vec![ArgType::String]),
    );
}
