//! Interactive raw editing of a config file
//!
//! The file is staged into a scratch copy under a two-line comment header,
//! handed to the user's editor, and copied back verbatim only if the
//! scratch file was modified and its header is intact.

use crate::{
    error::{EditCancelReason, Result, YoError},
    utils::{fs::FileSystemUtils, process::ProcessRunner},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Header placed above the file contents in the scratch copy
pub fn scratch_header(target: &Path) -> String {
    format!(
        "# Edit the contents below and save to update {}\n#\n",
        target.display()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderLine {
    /// A lone `#`
    Separator,
    /// Any other line starting with `#`
    Comment,
    Other,
}

impl HeaderLine {
    fn classify(line: &[u8]) -> Self {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line == b"#" {
            Self::Separator
        } else if line.starts_with(b"#") {
            Self::Comment
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderScan {
    Start,
    SawTitle,
}

/// Strip the scratch header, returning the bytes that follow it
///
/// Scanning stops at the first lone `#` line, which may be the first line
/// or come after exactly one other comment line. Anything else within the
/// first two lines means the header was damaged.
pub fn strip_header(contents: &[u8]) -> Result<&[u8]> {
    let corrupt = || YoError::edit_cancelled(EditCancelReason::CorruptHeader);
    let mut state = HeaderScan::Start;
    let mut offset = 0;

    while offset < contents.len() {
        let rest = &contents[offset..];
        let (line, next) = match rest.iter().position(|&b| b == b'\n') {
            Some(i) => (&rest[..i], offset + i + 1),
            None => (rest, contents.len()),
        };

        state = match (state, HeaderLine::classify(line)) {
            (_, HeaderLine::Separator) => return Ok(&contents[next..]),
            (HeaderScan::Start, HeaderLine::Comment) => HeaderScan::SawTitle,
            _ => return Err(corrupt()),
        };
        offset = next;
    }

    Err(corrupt())
}

/// Stages of an edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    HeaderWritten,
    AwaitingExternalEdit,
    Validating,
    Committed,
    Rejected(EditCancelReason),
}

/// One run of the edit workflow against a target config file
pub struct EditSession<'a> {
    target: PathBuf,
    editor: &'a str,
    runner: &'a ProcessRunner,
    fs_utils: FileSystemUtils,
    state: EditState,
}

impl<'a> EditSession<'a> {
    /// Create a session editing `target` with the `editor` command line
    pub fn new(target: impl Into<PathBuf>, editor: &'a str, runner: &'a ProcessRunner) -> Self {
        Self {
            target: target.into(),
            editor,
            runner,
            fs_utils: FileSystemUtils::new(),
            state: EditState::Idle,
        }
    }

    pub const fn state(&self) -> EditState {
        self.state
    }

    fn transition(&mut self, next: EditState) {
        debug!("Edit session: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn reject(&mut self, reason: EditCancelReason) -> YoError {
        self.transition(EditState::Rejected(reason));
        YoError::edit_cancelled(reason)
    }

    /// Drive the session to `Committed` or `Rejected`
    ///
    /// The scratch file is deleted when this returns, whatever the outcome.
    #[instrument(skip(self), fields(target = %self.target.display()))]
    pub fn run(&mut self) -> Result<()> {
        let original = self
            .fs_utils
            .read_optional(&self.target)
            .map_err(|e| YoError::file_system("read", &self.target, e))?
            .unwrap_or_default();

        let (scratch, stamp) = self.write_scratch(&original)?;
        self.transition(EditState::HeaderWritten);

        self.transition(EditState::AwaitingExternalEdit);
        let status = self
            .runner
            .run_editor(self.editor, scratch.path().as_os_str())?;
        if !status.success() {
            return Err(self.reject(EditCancelReason::EditorFailed {
                code: status.code(),
            }));
        }

        self.transition(EditState::Validating);
        let modified = self
            .fs_utils
            .modified(scratch.path())
            .map_err(|e| YoError::file_system("stat", scratch.path(), e))?;
        if modified == stamp {
            return Err(self.reject(EditCancelReason::NoChanges));
        }

        let edited = std::fs::read(scratch.path())
            .map_err(|e| YoError::file_system("read", scratch.path(), e))?;
        let body = match strip_header(&edited) {
            Ok(body) => body,
            Err(_) => return Err(self.reject(EditCancelReason::CorruptHeader)),
        };

        self.fs_utils
            .write_atomic(&self.target, body)
            .map_err(|e| YoError::file_system("write", &self.target, e))?;
        self.transition(EditState::Committed);

        info!("Updated {}", self.target.display());
        Ok(())
    }

    fn write_scratch(&self, original: &str) -> Result<(NamedTempFile, SystemTime)> {
        let mut scratch = tempfile::Builder::new()
            .prefix("yo-")
            .suffix(".tmp")
            .tempfile()
            .map_err(|e| YoError::file_system("create scratch file", std::env::temp_dir(), e))?;

        let header = scratch_header(&self.target);
        let fill = |file: &mut NamedTempFile| -> std::io::Result<()> {
            file.write_all(header.as_bytes())?;
            file.write_all(original.as_bytes())?;
            file.flush()
        };
        fill(&mut scratch).map_err(|e| YoError::file_system("write", scratch.path(), e))?;

        let stamp = self
            .fs_utils
            .modified(scratch.path())
            .map_err(|e| YoError::file_system("stat", scratch.path(), e))?;

        debug!("Scratch file at {}", scratch.path().display());
        Ok((scratch, stamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_corrupt(contents: &[u8]) {
        let result = strip_header(contents);
        assert!(
            matches!(
                result,
                Err(YoError::EditCancelled {
                    reason: EditCancelReason::CorruptHeader
                })
            ),
            "expected corrupt header for {:?}",
            String::from_utf8_lossy(contents)
        );
    }

    #[test]
    fn test_strip_intact_header() {
        let contents =
            b"# Edit the contents below and save to update /x/.yorc\n#\n[commands]\na=b\n";
        assert_eq!(strip_header(contents).unwrap(), b"[commands]\na=b\n");
    }

    #[test]
    fn test_strip_header_produced_by_scratch_header() {
        let mut contents = scratch_header(Path::new("/home/me/.yorc")).into_bytes();
        contents.extend_from_slice(b"# kept comment\n[commands]\n");
        assert_eq!(strip_header(&contents).unwrap(), b"# kept comment\n[commands]\n");
    }

    #[test]
    fn test_strip_header_with_empty_body() {
        assert_eq!(strip_header(b"# title\n#\n").unwrap(), b"");
        assert_eq!(strip_header(b"# title\n#").unwrap(), b"");
    }

    #[test]
    fn test_separator_with_trailing_space_is_not_separator() {
        assert_corrupt(b"# title\n# \n[commands]\n");
        assert_corrupt(b"# title\n#\t\n[commands]\n");
    }

    #[test]
    fn test_separator_as_first_line() {
        assert_eq!(strip_header(b"#\n[commands]\n").unwrap(), b"[commands]\n");
    }

    #[test]
    fn test_crlf_header() {
        assert_eq!(strip_header(b"# title\r\n#\r\nbody").unwrap(), b"body");
    }

    #[test]
    fn test_corrupt_title_removed_body_first() {
        assert_corrupt(b"[commands]\na=b\n");
    }

    #[test]
    fn test_corrupt_separator_replaced_by_content() {
        assert_corrupt(b"# title\n[commands]\n");
    }

    #[test]
    fn test_corrupt_two_content_comments() {
        assert_corrupt(b"# title\n# another comment\n#\n");
    }

    #[test]
    fn test_corrupt_blank_first_line() {
        assert_corrupt(b"\n# title\n#\n");
    }

    #[test]
    fn test_corrupt_blank_second_line() {
        assert_corrupt(b"# title\n\n#\n");
    }

    #[test]
    fn test_corrupt_empty_file() {
        assert_corrupt(b"");
    }

    #[test]
    fn test_corrupt_title_only() {
        assert_corrupt(b"# title\n");
    }

    #[test]
    fn test_session_starts_idle() {
        let runner = ProcessRunner::default();
        let session = EditSession::new("/tmp/.yorc", "vi", &runner);
        assert_eq!(session.state(), EditState::Idle);
    }

    #[cfg(unix)]
    mod workflow {
        use crate::core::editor::{EditSession, EditState};
        use crate::error::{EditCancelReason, YoError};
        use crate::utils::process::ProcessRunner;
        use std::fs;
        use tempfile::TempDir;

        // Rewrites the scratch file and pins its mtime far in the past so
        // the change is visible regardless of timestamp granularity.
        fn rewriting_editor(content: &str) -> String {
            format!("sh -c 'printf \"{content}\" > \"$0\" && touch -t 200101010000 \"$0\"'")
        }

        #[test]
        fn test_unchanged_scratch_is_rejected() {
            let temp_dir = TempDir::new().unwrap();
            let target = temp_dir.path().join(".yorc");
            fs::write(&target, "[commands]\na=b\n").unwrap();
            let runner = ProcessRunner::default();

            let mut session = EditSession::new(&target, "true", &runner);
            let err = session.run().unwrap_err();

            assert!(matches!(
                err,
                YoError::EditCancelled {
                    reason: EditCancelReason::NoChanges
                }
            ));
            assert_eq!(
                session.state(),
                EditState::Rejected(EditCancelReason::NoChanges)
            );
            assert_eq!(fs::read_to_string(&target).unwrap(), "[commands]\na=b\n");
        }

        #[test]
        fn test_edited_body_is_committed_verbatim() {
            let temp_dir = TempDir::new().unwrap();
            let target = temp_dir.path().join(".yorc");
            fs::write(&target, "[commands]\na=b\n").unwrap();
            let runner = ProcessRunner::default();

            let editor = rewriting_editor("# t\\n#\\n[commands]\\nx = y z\\n");
            let mut session = EditSession::new(&target, &editor, &runner);
            session.run().unwrap();

            assert_eq!(session.state(), EditState::Committed);
            assert_eq!(fs::read_to_string(&target).unwrap(), "[commands]\nx = y z\n");
        }

        #[test]
        fn test_corrupt_header_leaves_target_untouched() {
            let temp_dir = TempDir::new().unwrap();
            let target = temp_dir.path().join(".yorc");
            fs::write(&target, "[commands]\na=b\n").unwrap();
            let runner = ProcessRunner::default();

            let editor = rewriting_editor("[commands]\\nx=y\\n");
            let mut session = EditSession::new(&target, &editor, &runner);
            let err = session.run().unwrap_err();

            assert!(matches!(
                err,
                YoError::EditCancelled {
                    reason: EditCancelReason::CorruptHeader
                }
            ));
            assert_eq!(fs::read_to_string(&target).unwrap(), "[commands]\na=b\n");
        }

        #[test]
        fn test_failing_editor_cancels() {
            let temp_dir = TempDir::new().unwrap();
            let target = temp_dir.path().join(".yorc");
            fs::write(&target, "[commands]\na=b\n").unwrap();
            let runner = ProcessRunner::default();

            let mut session = EditSession::new(&target, "false", &runner);
            let err = session.run().unwrap_err();

            assert!(matches!(
                err,
                YoError::EditCancelled {
                    reason: EditCancelReason::EditorFailed { code: Some(1) }
                }
            ));
            assert_eq!(fs::read_to_string(&target).unwrap(), "[commands]\na=b\n");
        }

        #[test]
        fn test_missing_target_is_created() {
            let temp_dir = TempDir::new().unwrap();
            let target = temp_dir.path().join(".yorc");
            let runner = ProcessRunner::default();

            let editor = rewriting_editor("# t\\n#\\n[commands]\\nnew=echo\\n");
            let mut session = EditSession::new(&target, &editor, &runner);
            session.run().unwrap();

            assert_eq!(fs::read_to_string(&target).unwrap(), "[commands]\nnew=echo\n");
        }
    }
}
