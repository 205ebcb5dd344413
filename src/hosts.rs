//! Managed `/etc/hosts` block.
//!
//! Records live between two sentinel lines. Each write drops the previous
//! block, trims trailing whitespace and appends a fresh block, then swaps the
//! file in with a rename so readers never observe a partial write.
//! The file is handled as raw bytes; only the sentinel lines need to be ASCII.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::ec2::instances::Instance;
use crate::error::{AppError, Result};

pub const BLOCK_START: &str = "# AWS records - start";
pub const BLOCK_END: &str = "# AWS records - end";

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// One record line, `None` for instances without a public IP.
pub fn format_record(instance: &Instance) -> Option<String> {
    instance
        .public_ip()
        .map(|ip| format!("{}   {}   # {}", ip, instance.display_name(), instance.id))
}

/// Sentinel-delimited block with one line per addressable instance.
pub fn render_hosts_block(instances: &[Instance]) -> String {
    let mut block = String::new();
    block.push_str(BLOCK_START);
    block.push('\n');
    for record in instances.iter().filter_map(format_record) {
        block.push_str(&record);
        block.push('\n');
    }
    block.push_str(BLOCK_END);
    block.push('\n');
    block
}

/// Byte range of the first line equal to `needle` at or after `from`.
/// The range excludes the line terminator.
fn find_line(content: &[u8], needle: &str, from: usize) -> Option<(usize, usize)> {
    let mut offset = from;
    for line in content[from..].split_inclusive(|&b| b == b'\n') {
        let text = line.strip_suffix(b"\n").unwrap_or(line);
        let text = text.strip_suffix(b"\r").unwrap_or(text);
        if text == needle.as_bytes() {
            return Some((offset, offset + text.len()));
        }
        offset += line.len();
    }
    None
}

/// Remove the managed block, keeping the text around it byte for byte.
///
/// A start marker without an end marker only loses the marker line itself.
pub fn strip_hosts_block(content: &[u8]) -> Vec<u8> {
    let Some((start, start_end)) = find_line(content, BLOCK_START, 0) else {
        return content.to_vec();
    };

    let end = match find_line(content, BLOCK_END, start_end) {
        Some((_, end)) => end,
        None => {
            warn!("Managed block has no end marker, removing only the start marker line");
            content[start_end..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(content.len(), |pos| start_end + pos + 1)
        }
    };

    [&content[..start], &content[end..]].concat()
}

/// New file content with the managed block replaced by `instances`.
pub fn patch_hosts_content(existing: &[u8], instances: &[Instance]) -> Vec<u8> {
    let stripped = strip_hosts_block(existing);
    let mut content = stripped.trim_ascii_end().to_vec();
    content.extend_from_slice(b"\n\n");
    content.extend_from_slice(render_hosts_block(instances).as_bytes());
    content
}

/// Replace the managed block of `path` atomically.
pub fn write_hosts_block(path: &Path, instances: &[Instance]) -> Result<()> {
    let io_err = |source: std::io::Error| AppError::HostsFile {
        path: path.to_path_buf(),
        source,
    };

    let existing = fs::read(path).map_err(io_err)?;
    let content = patch_hosts_content(&existing, instances);

    // Same directory as the target so the rename never crosses filesystems
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&content).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(FILE_MODE)).map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
