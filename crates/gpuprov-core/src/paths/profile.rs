//! Shell profile persistence.
//!
//! gpuprov owns a single marked block in the shell profile:
//!
//! ```text
//! # >>> gpuprov >>>
//! export CUDA_HOME="/usr/local/cuda-12.6"
//! # <<< gpuprov <<<
//! ```
//!
//! Only that block is ever rewritten. Lines outside it belong to the user
//! and are kept verbatim, including their own `PATH` exports.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;
use crate::domain::EnvExport;

/// First line of the managed block.
pub const BLOCK_START: &str = "# >>> gpuprov >>>";

/// Last line of the managed block.
pub const BLOCK_END: &str = "# <<< gpuprov <<<";

/// Apply `exports` to the profile at `path`, creating it if missing.
pub fn persist_exports(path: &Path, exports: &[EnvExport]) -> Result<(), PathError> {
    let profile_err = |e: std::io::Error| PathError::ProfileError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let existing = if path.exists() {
        fs::read_to_string(path).map_err(profile_err)?
    } else {
        String::new()
    };

    let content = merge_exports(&existing, exports);

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(profile_err)?;
    file.write_all(content.as_bytes()).map_err(profile_err)?;

    Ok(())
}

/// Pure merge of `exports` into profile text.
///
/// The last start marker followed by an end marker delimits the managed
/// block, which is replaced where it stands; otherwise a new block is
/// appended. An unterminated start marker is treated as user text.
pub fn merge_exports(existing: &str, exports: &[EnvExport]) -> String {
    let lines: Vec<&str> = existing.lines().collect();
    let start = lines.iter().rposition(|l| l.trim() == BLOCK_START);
    let end = start.and_then(|s| {
        lines[s..]
            .iter()
            .position(|l| l.trim() == BLOCK_END)
            .map(|offset| s + offset)
    });

    let (mut output, at): (Vec<String>, usize) = match (start, end) {
        (Some(s), Some(e)) => {
            let kept = lines[..s]
                .iter()
                .chain(&lines[e + 1..])
                .map(ToString::to_string)
                .collect();
            (kept, s)
        }
        _ => {
            let mut kept: Vec<String> = lines.iter().map(ToString::to_string).collect();
            if !exports.is_empty() && kept.last().is_some_and(|l| !l.trim().is_empty()) {
                kept.push(String::new());
            }
            let len = kept.len();
            (kept, len)
        }
    };

    if !exports.is_empty() {
        let block = std::iter::once(BLOCK_START.to_string())
            .chain(exports.iter().map(EnvExport::to_shell_line))
            .chain(std::iter::once(BLOCK_END.to_string()));
        output.splice(at..at, block);
    }

    let mut content = output.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cuda_exports() -> Vec<EnvExport> {
        vec![
            EnvExport::new("CUDA_HOME", "/usr/local/cuda-12.6"),
            EnvExport::new("TORCH_CUDA_ARCH_LIST", "8.9"),
        ]
    }

    #[test]
    fn test_appends_block_to_existing_profile() {
        let merged = merge_exports("alias ll='ls -l'\n", &cuda_exports());
        assert_eq!(
            merged,
            "alias ll='ls -l'\n\n# >>> gpuprov >>>\nexport CUDA_HOME=\"/usr/local/cuda-12.6\"\nexport TORCH_CUDA_ARCH_LIST=\"8.9\"\n# <<< gpuprov <<<\n"
        );
    }

    #[test]
    fn test_user_path_exports_survive() {
        let existing = "export PATH=\"$HOME/.cargo/bin:$PATH\"\nexport PATH=\"$HOME/.pyenv/bin:$PATH\"\nalias ll='ls -l'\n";
        let exports = [EnvExport::new("PATH", "/usr/local/cuda-12.6/bin:$PATH")];

        let merged = merge_exports(existing, &exports);

        assert!(merged.starts_with(existing));
        assert!(merged.contains("export PATH=\"$HOME/.cargo/bin:$PATH\""));
        assert!(merged.contains("export PATH=\"$HOME/.pyenv/bin:$PATH\""));
        assert!(merged.contains("export PATH=\"/usr/local/cuda-12.6/bin:$PATH\""));
    }

    #[test]
    fn test_replaces_managed_block_in_place() {
        let existing = "export EDITOR=vim\n# >>> gpuprov >>>\nexport CUDA_HOME=\"/usr/local/cuda-11.8\"\n# <<< gpuprov <<<\nexport CUDA_HOME=/mine\n";
        let merged = merge_exports(existing, &cuda_exports()[..1]);
        assert_eq!(
            merged,
            "export EDITOR=vim\n# >>> gpuprov >>>\nexport CUDA_HOME=\"/usr/local/cuda-12.6\"\n# <<< gpuprov <<<\nexport CUDA_HOME=/mine\n"
        );
    }

    #[test]
    fn test_unterminated_marker_is_left_alone() {
        let existing = "# >>> gpuprov >>>\nexport PATH=\"$HOME/bin:$PATH\"\n";
        let merged = merge_exports(existing, &cuda_exports()[..1]);
        assert!(merged.starts_with(existing));
        assert_eq!(merged.matches(BLOCK_START).count(), 2);
        assert!(merged.ends_with("# <<< gpuprov <<<\n"));

        let again = merge_exports(&merged, &cuda_exports()[..1]);
        assert_eq!(again, merged);
    }

    #[test]
    fn test_persist_is_idempotent() {
        let temp = tempdir().unwrap();
        let profile = temp.path().join(".bashrc");

        persist_exports(&profile, &cuda_exports()).unwrap();
        let first = fs::read_to_string(&profile).unwrap();
        persist_exports(&profile, &cuda_exports()).unwrap();
        let second = fs::read_to_string(&profile).unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with('\n'));
        assert_eq!(first.matches("CUDA_HOME").count(), 1);
        assert_eq!(first.matches(BLOCK_START).count(), 1);
    }
}
