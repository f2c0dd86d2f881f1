//! Mock-server generator: emits the browser-side script that answers the
//! report's GET requests from an in-memory URL map.
//!
//! The script is plain text to this tool. It is written into the report
//! directory as `server.js` and picked up by the inliner like any other
//! referenced script; nothing here executes it.

use crate::errors::{FuseError, FuseResult};
use crate::models::Asset;
use std::fs;
use std::path::Path;

/// Fixed browser-side prelude: base64/ArrayBuffer helpers plus a DOM-ready
/// hook that rewrites `href`/`src` attributes of dynamically inserted HTML
/// fragments to their in-memory data values.
const SERVER_PRELUDE: &str = r#"function _base64ToArrayBuffer(base64) {
    var binary_string = window.atob(base64);
    var len = binary_string.length;
    var bytes = new Uint8Array(len);
    for (var i = 0; i < len; i++) {
        bytes[i] = binary_string.charCodeAt(i);
    }
    return bytes.buffer;
}

function _arrayBufferToBase64(buffer) {
    var binary = '';
    var bytes = new Uint8Array(buffer);
    var len = bytes.byteLength;
    for (var i = 0; i < len; i++) {
        binary += String.fromCharCode(bytes[i]);
    }
    return window.btoa(binary);
}

document.addEventListener("DOMContentLoaded", function() {
    var old_prefilter = jQuery.htmlPrefilter;

    jQuery.htmlPrefilter = function(v) {
        var regs = [
            /<a[^>]*href="(?<url>[^"]*)"[^>]*>/,
            /<img[^>]*src="(?<url>[^"]*)"\/?>/
        ];

        for (var i in regs) {
            var m = regs[i].exec(v);
            if (m && m.groups && m.groups.url) {
                var url = m.groups.url;
                if (server_data.hasOwnProperty(url)) {
                    v = v.replace(url, server_data[url]);
                }
            }
        }

        return old_prefilter(v);
    };
});
"#;

/// Escape text for embedding in a double-quoted script string literal.
/// Carriage returns are escaped too: a raw CR is an ECMAScript line
/// terminator and would split the literal.
fn escape_js_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Data URI carrying a base64 payload.
fn data_uri(mime: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime, payload)
}

/// The map value stored for one asset.
fn stored_value(asset: &Asset) -> String {
    if asset.is_binary {
        data_uri(&asset.mime_type, &asset.content)
    } else {
        escape_js_string(&asset.content)
    }
}

pub struct ServerGenerator;

impl ServerGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build the complete fake-server script for the given assets.
    pub fn generate(&self, assets: &[Asset]) -> String {
        let mut script = String::from(SERVER_PRELUDE);

        script.push_str("\nvar server_data = {\n");
        for asset in assets {
            script.push_str(&format!(
                "  \"{}\": \"{}\",\n",
                asset.url,
                stored_value(asset)
            ));
        }
        script.push_str("};\n\n");

        script.push_str("var server = sinon.fakeServer.create();\n");
        for asset in assets {
            script.push_str(&format!(
                "server.respondWith(\"GET\", \"{url}\", [\n  200, {{ \"Content-Type\": \"{mime}\" }}, server_data[\"{url}\"],\n]);\n",
                url = asset.url,
                mime = asset.mime_type
            ));
        }
        script.push_str("server.autoRespond = true;\n");

        script
    }

    /// Write the script as `server.js` inside the report directory.
    pub fn write(&self, root: &Path, assets: &[Asset]) -> FuseResult<u64> {
        log::info!("Building server.js");
        let path = root.join("server.js");
        let script = self.generate(assets);
        fs::write(&path, &script).map_err(|e| FuseError::io(e, path.clone()))?;
        log::info!("server.js built, size: {} bytes", script.len());
        Ok(script.len() as u64)
    }

    /// Copy the fake-server helper script next to `server.js` and return its
    /// file name, which the patch step injects into the shell.
    pub fn copy_helper(&self, helper: &Path, root: &Path) -> FuseResult<String> {
        let file_name = helper
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| FuseError::InvalidPath(helper.display().to_string()))?;

        let dest = root.join(&file_name);
        log::info!("Copying {} into the report directory", file_name);
        fs::copy(helper, &dest).map_err(|e| FuseError::io(e, helper.to_path_buf()))?;
        Ok(file_name)
    }
}
