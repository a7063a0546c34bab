/// Read-only marking for relocated files.
use std::fs;
use std::io;
use std::path::Path;

/// Remove write permission for owner, group and other from `path`.
///
/// Other permission bits are left as they were. On non-Unix platforms this
/// sets the read-only attribute.
pub fn strip_write_permission(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    set_read_only(&mut perms);
    fs::set_permissions(path, perms)
}

#[cfg(unix)]
fn set_read_only(perms: &mut fs::Permissions) {
    use std::os::unix::fs::PermissionsExt;
    perms.set_mode(perms.mode() & !0o222);
}

#[cfg(not(unix))]
fn set_read_only(perms: &mut fs::Permissions) {
    perms.set_readonly(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_becomes_read_only() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.wav");
        fs::write(&path, b"x").unwrap();

        strip_write_permission(&path).unwrap();
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[cfg(unix)]
    #[test]
    fn only_write_bits_are_cleared() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.wav");
        fs::write(&path, b"x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o764)).unwrap();

        strip_write_permission(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o544);
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(strip_write_permission(&tmp.path().join("gone.wav")).is_err());
    }
}
