//! Host operating system probing

use std::ffi::CStr;
use std::io;
use std::mem::MaybeUninit;

/// Kernel release string, e.g. `"23.4.0"`
pub fn release() -> io::Result<String> {
    let mut uts = MaybeUninit::<libc::utsname>::zeroed();

    let result = unsafe { libc::uname(uts.as_mut_ptr()) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    let uts = unsafe { uts.assume_init() };
    let release = unsafe { CStr::from_ptr(uts.release.as_ptr()) };
    Ok(release.to_string_lossy().into_owned())
}

/// Leading integer of a release string; `None` if it has none.
pub fn major_version(release: &str) -> Option<u32> {
    let end = release
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(release.len());
    release[..end].parse().ok()
}
