//! Base64 packaging of the template workbook.
//!
//! The generated fragment defines one string constant and exposes it to
//! both consuming environments: the browser (via `window`) and Node.js
//! (via `module.exports`).

use crate::error::KitResult;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;
use tracing::info;

/// Identifier the fragment exposes.
pub const TEMPLATE_CONSTANT: &str = "TEMPLATE_BASE64";

#[derive(Debug, Clone, Copy)]
pub struct PackageStats {
    pub raw_bytes: usize,
    pub encoded_chars: usize,
}

/// Read a binary file, Base64-encode it and write the JS fragment.
pub fn package(input: &Path, output: &Path) -> KitResult<PackageStats> {
    let bytes = fs::read(input)?;
    let encoded = STANDARD.encode(&bytes);

    let stats = PackageStats {
        raw_bytes: bytes.len(),
        encoded_chars: encoded.len(),
    };

    fs::write(output, render_fragment(&encoded))?;
    info!(
        "packaged {} ({} bytes -> {} chars)",
        input.display(),
        stats.raw_bytes,
        stats.encoded_chars
    );
    Ok(stats)
}

fn render_fragment(encoded: &str) -> String {
    format!(
        r#"/**
 * Excelテンプレートデータ（Base64エンコード）
 */

const {name} = '{encoded}';

// ブラウザ環境で使用
if (typeof window !== 'undefined') {{
    window.{name} = {name};
}}

// Node.js環境で使用
if (typeof module !== 'undefined' && module.exports) {{
    module.exports = {name};
}}
"#,
        name = TEMPLATE_CONSTANT,
        encoded = encoded
    )
}
