//! Owner-only access for the config file
//!
//! On Unix the file mode is set to `0600`. On Windows the file gets a
//! protected DACL with a single entry granting the current user full access,
//! so nothing is inherited from the containing directory.

use std::io;
use std::path::Path;

/// Mode applied to the config file on Unix
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o600;

/// Restrict `path` to its owner
#[cfg(unix)]
pub fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(CONFIG_FILE_MODE))
}

/// Restrict `path` to the current user
#[cfg(windows)]
pub fn restrict_to_owner(path: &Path) -> io::Result<()> {
    windows_acl::restrict_to_current_user(path)
}

/// No access control is available on this platform
#[cfg(not(any(unix, windows)))]
pub fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(windows)]
#[allow(unsafe_code)]
mod windows_acl {
    use std::ffi::c_void;
    use std::io;
    use std::iter;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use std::ptr;

    use windows::Win32::Foundation::{CloseHandle, ERROR_SUCCESS, HANDLE, HLOCAL, LocalFree};
    use windows::Win32::Security::Authorization::{
        EXPLICIT_ACCESS_W, NO_MULTIPLE_TRUSTEE, SE_FILE_OBJECT, SET_ACCESS, SetEntriesInAclW,
        SetNamedSecurityInfoW, TRUSTEE_IS_SID, TRUSTEE_IS_USER, TRUSTEE_W,
    };
    use windows::Win32::Security::{
        ACL, DACL_SECURITY_INFORMATION, GetTokenInformation, NO_INHERITANCE,
        PROTECTED_DACL_SECURITY_INFORMATION, PSID, TOKEN_QUERY, TOKEN_USER, TokenUser,
    };
    use windows::Win32::Storage::FileSystem::FILE_ALL_ACCESS;
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};
    use windows::core::{PCWSTR, PWSTR};

    /// `TOKEN_USER` of the current process, backed by an aligned buffer
    struct CurrentUser {
        buffer: Vec<u64>,
    }

    impl CurrentUser {
        fn query() -> io::Result<Self> {
            let mut token = HANDLE::default();
            // SAFETY: `token` is a valid out pointer for the duration of the call.
            unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) }
                .map_err(io::Error::other)?;

            let result = Self::read_token_user(token);
            // SAFETY: `token` was opened above and is closed exactly once.
            let _ = unsafe { CloseHandle(token) };
            result
        }

        fn read_token_user(token: HANDLE) -> io::Result<Self> {
            let mut needed = 0u32;
            // Sizing call; it fails with ERROR_INSUFFICIENT_BUFFER and sets `needed`.
            // SAFETY: a null buffer of length zero is allowed for sizing.
            let _ = unsafe { GetTokenInformation(token, TokenUser, None, 0, &mut needed) };
            if needed == 0 {
                return Err(io::Error::last_os_error());
            }

            let mut buffer = vec![0u64; (needed as usize).div_ceil(size_of::<u64>())];
            // SAFETY: `buffer` holds at least `needed` writable bytes.
            unsafe {
                GetTokenInformation(
                    token,
                    TokenUser,
                    Some(buffer.as_mut_ptr().cast::<c_void>()),
                    needed,
                    &mut needed,
                )
            }
            .map_err(io::Error::other)?;

            Ok(Self { buffer })
        }

        fn sid(&self) -> PSID {
            // SAFETY: the buffer was filled by GetTokenInformation(TokenUser) and
            // is aligned for TOKEN_USER; the SID it points to lives inside it.
            unsafe { (*self.buffer.as_ptr().cast::<TOKEN_USER>()).User.Sid }
        }
    }

    pub fn restrict_to_current_user(path: &Path) -> io::Result<()> {
        let user = CurrentUser::query()?;

        let access = EXPLICIT_ACCESS_W {
            grfAccessPermissions: FILE_ALL_ACCESS.0,
            grfAccessMode: SET_ACCESS,
            grfInheritance: NO_INHERITANCE,
            Trustee: TRUSTEE_W {
                pMultipleTrustee: ptr::null_mut(),
                MultipleTrusteeOperation: NO_MULTIPLE_TRUSTEE,
                TrusteeForm: TRUSTEE_IS_SID,
                TrusteeType: TRUSTEE_IS_USER,
                ptstrName: PWSTR(user.sid().0.cast::<u16>()),
            },
        };

        let mut acl: *mut ACL = ptr::null_mut();
        // SAFETY: `access` and `acl` outlive the call; `acl` receives a LocalAlloc'd ACL.
        let status = unsafe { SetEntriesInAclW(Some(&[access]), None, &mut acl) };
        if status != ERROR_SUCCESS {
            return Err(io::Error::from_raw_os_error(status.0 as i32));
        }

        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(iter::once(0))
            .collect();
        // SAFETY: `wide` is NUL-terminated and `acl` is the valid ACL built above.
        let status = unsafe {
            SetNamedSecurityInfoW(
                PCWSTR(wide.as_ptr()),
                SE_FILE_OBJECT,
                DACL_SECURITY_INFORMATION | PROTECTED_DACL_SECURITY_INFORMATION,
                PSID::default(),
                PSID::default(),
                Some(acl),
                None,
            )
        };
        // SAFETY: `acl` was allocated by SetEntriesInAclW and is freed once.
        let _ = unsafe { LocalFree(HLOCAL(acl.cast::<c_void>())) };

        if status == ERROR_SUCCESS {
            Ok(())
        } else {
            Err(io::Error::from_raw_os_error(status.0 as i32))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[cfg(unix)]
    #[test]
    fn test_unix_mode_is_owner_read_write() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let file = NamedTempFile::new().unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o666)).unwrap();

        restrict_to_owner(file.path()).unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, CONFIG_FILE_MODE);
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_acl_has_single_explicit_entry() {
        use std::process::Command;

        let file = NamedTempFile::new().unwrap();
        restrict_to_owner(file.path()).unwrap();

        let output = Command::new("icacls").arg(file.path()).output().unwrap();
        assert!(output.status.success());
        let listing = String::from_utf8_lossy(&output.stdout);

        // One ACE line ending in full control; nothing inherited
        let entries: Vec<&str> = listing.lines().filter(|line| line.contains(":(")).collect();
        assert_eq!(entries.len(), 1, "unexpected ACL: {listing}");
        assert!(entries[0].trim_end().ends_with("(F)"), "unexpected ACL: {listing}");
        assert!(!listing.contains("(I)"), "inherited entries remain: {listing}");
    }
}
