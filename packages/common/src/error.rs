use seedport_parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Common error type shared by the seedport crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("List '{list}' not found in {}", path.display())]
    ListNotFound { list: String, path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_path() {
        let err = CommonError::InputNotFound(PathBuf::from("prisma/seed.ts"));
        assert_eq!(err.to_string(), "Input path does not exist: prisma/seed.ts");

        let err = CommonError::ListNotFound {
            list: "skills".to_string(),
            path: PathBuf::from("seeds"),
        };
        assert_eq!(err.to_string(), "List 'skills' not found in seeds");
    }

    #[test]
    fn test_parse_and_io_errors_convert() {
        let err: CommonError = ParseError::unexpected_eof(3, "value").into();
        assert!(matches!(err, CommonError::Parse(_)));

        let err: CommonError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CommonError::Io(_)));
    }
}
