//! Loader and row source tests

use std::io::Write;

use csv_schema_validator::{
    AnyValidator, CsvValidator, LocalFileLoader, Loader, LoaderError, RowSource, Schema,
    StringLoader, ValidationError,
};

mod local_file_tests {
    use super::*;

    #[test]
    fn test_local_file_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,name\n1,alpha\n\n2,beta\n").unwrap();

        let loader = LocalFileLoader::new(file.path());
        let rows = RowSource::new(loader.open().unwrap(), b',').unwrap();
        assert_eq!(rows.headers().unwrap(), ["id", "name"]);

        let rows: Vec<_> = rows.map(Result::unwrap).collect();
        // Blank lines are skipped and do not consume a row index
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index(), 1);
        assert_eq!(rows[1].get("name"), Some("beta"));
    }

    #[test]
    fn test_missing_file_is_loader_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = LocalFileLoader::new(dir.path().join("missing.csv"));
        let mut validator = CsvValidator::new(loader, Schema::new());

        assert!(matches!(
            validator.run(),
            Err(ValidationError::Loader(LoaderError::Io { .. }))
        ));
    }
}

mod string_tests {
    use super::*;

    #[test]
    fn test_invalid_utf8_is_loader_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\n\xff\xfe\n").unwrap();

        let schema = Schema::new().rule("a", AnyValidator::new());
        let mut validator = CsvValidator::new(LocalFileLoader::new(file.path()), schema);
        assert!(matches!(
            validator.run(),
            Err(ValidationError::Loader(LoaderError::Parse(_)))
        ));
    }

    #[test]
    fn test_string_loader_can_be_reopened() {
        let loader = StringLoader::new("a\n1\n");
        for _ in 0..2 {
            let mut rows = RowSource::new(loader.open().unwrap(), b',').unwrap();
            assert_eq!(rows.next().unwrap().unwrap().get("a"), Some("1"));
        }
    }

    #[test]
    fn test_boxed_loader() {
        let loader: Box<dyn Loader> = Box::new(StringLoader::named("<stdin>", "a\n1\n"));
        let schema = Schema::new().rule("a", AnyValidator::new());
        let mut validator = CsvValidator::new(loader, schema);
        let outcome = validator.run().unwrap();

        assert!(outcome.passed);
        assert!(outcome.log.starts_with("Validating CsvValidator(source=StringLoader('<stdin>'))"));
    }
}
