//! Commands and the script parser
//!
//! A command is one parsed, immutable instruction against the tree. The
//! parser validates the whole script up front: any malformed line aborts
//! before a single command runs.

pub mod queue;

use crate::error::ParseError;
use crate::types::{AccessMode, NodeKind};
use self::queue::CommandQueue;
use std::io::BufRead;
use tracing::warn;

/// One parsed instruction to apply to the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { path: String, kind: NodeKind },
    Lookup { path: String },
    Delete { path: String },
}

impl Command {
    pub fn path(&self) -> &str {
        match self {
            Command::Create { path, .. } | Command::Lookup { path } | Command::Delete { path } => {
                path
            }
        }
    }

    /// Access mode this command requires on the shared tree
    pub fn access_mode(&self) -> AccessMode {
        match self {
            Command::Lookup { .. } => AccessMode::Read,
            Command::Create { .. } | Command::Delete { .. } => AccessMode::Write,
        }
    }
}

/// Parse a command script and enqueue every command, in order.
///
/// Line format: `c <path> <f|d>`, `l <path>`, `d <path>`; `#`-prefixed and
/// blank lines are skipped. Any other shape is a fatal [`ParseError`].
///
/// Returns the number of commands admitted. When the queue refuses a command
/// (capacity exhausted) the remainder of the script is ignored for the run;
/// this mirrors the fixed command buffer of the original tool and is not an
/// error.
pub fn load_script<R: BufRead>(reader: R, queue: &CommandQueue) -> Result<usize, ParseError> {
    let mut admitted = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = tokens.first() else {
            continue;
        };
        if head.starts_with('#') {
            continue;
        }

        let command = match head {
            "c" if tokens.len() == 3 => {
                let kind = match tokens[2] {
                    "f" => NodeKind::File,
                    "d" => NodeKind::Directory,
                    other => {
                        return Err(ParseError::InvalidKind {
                            line: number,
                            kind: other.to_string(),
                        })
                    }
                };
                Command::Create {
                    path: tokens[1].to_string(),
                    kind,
                }
            }
            "l" if tokens.len() == 2 => Command::Lookup {
                path: tokens[1].to_string(),
            },
            "d" if tokens.len() == 2 => Command::Delete {
                path: tokens[1].to_string(),
            },
            _ => {
                return Err(ParseError::InvalidCommand {
                    line: number,
                    text: line.clone(),
                })
            }
        };

        if !queue.enqueue(command) {
            warn!(
                admitted,
                capacity = queue.capacity(),
                "command queue full, ignoring remainder of script"
            );
            break;
        }
        admitted += 1;
    }
    Ok(admitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(script: &str, capacity: usize) -> Result<(usize, Vec<Command>), ParseError> {
        let queue = CommandQueue::with_capacity(capacity);
        let admitted = load_script(Cursor::new(script), &queue)?;
        let mut commands = Vec::new();
        while let Some(command) = queue.dequeue() {
            commands.push(command);
        }
        Ok((admitted, commands))
    }

    #[test]
    fn test_parse_all_command_forms() {
        let script = "c /a d\nc /a/b f\nl /a/b\nd /a\n";
        let (admitted, commands) = load(script, 10).unwrap();
        assert_eq!(admitted, 4);
        assert_eq!(
            commands,
            vec![
                Command::Create {
                    path: "/a".to_string(),
                    kind: NodeKind::Directory
                },
                Command::Create {
                    path: "/a/b".to_string(),
                    kind: NodeKind::File
                },
                Command::Lookup {
                    path: "/a/b".to_string()
                },
                Command::Delete {
                    path: "/a".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let script = "# header\n\n   \nc /a d\n#c /b d\n";
        let (admitted, commands) = load(script, 10).unwrap();
        assert_eq!(admitted, 1);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_unknown_token_is_fatal() {
        let err = load("x /a\n", 10).unwrap_err();
        assert!(matches!(err, ParseError::InvalidCommand { line: 1, .. }));
    }

    #[test]
    fn test_wrong_token_count_is_fatal() {
        assert!(matches!(
            load("c /a\n", 10).unwrap_err(),
            ParseError::InvalidCommand { line: 1, .. }
        ));
        assert!(matches!(
            load("l /a extra\n", 10).unwrap_err(),
            ParseError::InvalidCommand { line: 1, .. }
        ));
        assert!(matches!(
            load("c /a d extra\n", 10).unwrap_err(),
            ParseError::InvalidCommand { line: 1, .. }
        ));
    }

    #[test]
    fn test_bad_kind_letter_is_fatal() {
        let err = load("c /a x\n", 10).unwrap_err();
        match err {
            ParseError::InvalidKind { line, kind } => {
                assert_eq!(line, 1);
                assert_eq!(kind, "x");
            }
            other => panic!("expected InvalidKind, got {:?}", other),
        }
    }

    #[test]
    fn test_error_reports_line_number() {
        let err = load("c /a d\nl /b\nbogus\n", 10).unwrap_err();
        assert!(matches!(err, ParseError::InvalidCommand { line: 3, .. }));
    }

    #[test]
    fn test_capacity_exhaustion_stops_intake() {
        let script = "c /a d\nc /b d\nc /c d\nc /d d\n";
        let (admitted, commands) = load(script, 2).unwrap();
        assert_eq!(admitted, 2);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_access_modes() {
        let lookup = Command::Lookup {
            path: "/a".to_string(),
        };
        let create = Command::Create {
            path: "/a".to_string(),
            kind: NodeKind::File,
        };
        let delete = Command::Delete {
            path: "/a".to_string(),
        };
        assert_eq!(lookup.access_mode(), AccessMode::Read);
        assert_eq!(create.access_mode(), AccessMode::Write);
        assert_eq!(delete.access_mode(), AccessMode::Write);
    }
}
