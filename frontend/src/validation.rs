use crate::error::ValidationError;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Checks a candidate statement before it may be uploaded. The extension
/// check runs first; the size limit is inclusive.
pub fn validate_statement(name: &str, size: u64, limit: u64) -> Result<(), ValidationError> {
    if !name.to_ascii_lowercase().ends_with(".xml") {
        return Err(ValidationError::NotXml);
    }
    if size > limit {
        return Err(ValidationError::TooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_extension_at_the_limit_is_accepted() {
        assert_eq!(
            validate_statement("statement.XML", MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES),
            Ok(())
        );
    }

    #[test]
    fn one_byte_over_the_limit_is_rejected() {
        assert_eq!(
            validate_statement("statement.xml", MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES),
            Err(ValidationError::TooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn wrong_extension_is_rejected_regardless_of_size() {
        for size in [0, 10, MAX_UPLOAD_BYTES * 4] {
            assert_eq!(
                validate_statement("statement.txt", size, MAX_UPLOAD_BYTES),
                Err(ValidationError::NotXml)
            );
        }
        assert_eq!(
            validate_statement("statement.xml.bak", 10, MAX_UPLOAD_BYTES),
            Err(ValidationError::NotXml)
        );
    }

    #[test]
    fn empty_xml_file_passes_client_checks() {
        assert_eq!(validate_statement("sms.xml", 0, MAX_UPLOAD_BYTES), Ok(()));
    }
}
