//! Associated-icon extraction through the Windows shell.

use crate::icon::IconImage;
use crate::Result;
use std::path::Path;

/// Extracts the icon the shell associates with a file.
pub trait IconExtractor {
    fn extract_associated(&self, path: &Path) -> Result<IconImage>;
}

/// `ExtractAssociatedIconW` on Windows; unsupported elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellIconExtractor;

impl IconExtractor for ShellIconExtractor {
    fn extract_associated(&self, path: &Path) -> Result<IconImage> {
        #[cfg(windows)]
        {
            win::extract(path)
        }

        #[cfg(not(windows))]
        {
            let _ = path;
            Err(crate::PerchError::Unsupported {
                operation: "associated icon extraction".into(),
            })
        }
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
mod win {
    use crate::icon::IconImage;
    use crate::{PerchError, Result};
    use std::ffi::c_void;
    use std::mem;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use std::ptr;
    use windows_sys::Win32::Graphics::Gdi::{
        CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits, GetObjectW, BITMAP, BITMAPINFO,
        BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
    };
    use windows_sys::Win32::UI::Shell::ExtractAssociatedIconW;
    use windows_sys::Win32::UI::WindowsAndMessaging::{DestroyIcon, GetIconInfo, HICON, ICONINFO};

    /// The path buffer is in/out and must hold `MAX_PATH` characters.
    const MAX_PATH: usize = 260;

    fn decode_error(path: &Path, message: impl Into<String>) -> PerchError {
        PerchError::IconDecode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(super) fn extract(path: &Path) -> Result<IconImage> {
        let mut buffer: Vec<u16> = path.as_os_str().encode_wide().collect();
        if buffer.len() >= MAX_PATH {
            return Err(decode_error(path, "path too long"));
        }
        buffer.resize(MAX_PATH, 0);
        let mut index: u16 = 0;

        // SAFETY: `buffer` is NUL-terminated and MAX_PATH wide, as the call may
        // write the icon's source path back into it.
        let icon = unsafe { ExtractAssociatedIconW(ptr::null_mut(), buffer.as_mut_ptr(), &mut index) };
        if icon.is_null() {
            return Err(decode_error(path, "no associated icon"));
        }

        let image = icon_to_rgba(icon, path);
        // SAFETY: `icon` came from ExtractAssociatedIconW and is destroyed exactly once.
        unsafe { DestroyIcon(icon) };
        image
    }

    fn icon_to_rgba(icon: HICON, path: &Path) -> Result<IconImage> {
        // SAFETY: ICONINFO is plain data; GetIconInfo fills it for a valid icon handle.
        let mut info: ICONINFO = unsafe { mem::zeroed() };
        if unsafe { GetIconInfo(icon, &mut info) } == 0 {
            return Err(decode_error(path, "GetIconInfo failed"));
        }

        let result = if info.hbmColor.is_null() {
            Err(decode_error(path, "monochrome icons are not supported"))
        } else {
            read_bitmap(info.hbmColor, path)
        };

        // SAFETY: GetIconInfo hands ownership of both bitmaps to the caller.
        unsafe {
            if !info.hbmColor.is_null() {
                DeleteObject(info.hbmColor);
            }
            if !info.hbmMask.is_null() {
                DeleteObject(info.hbmMask);
            }
        }
        result
    }

    fn read_bitmap(bitmap: *mut c_void, path: &Path) -> Result<IconImage> {
        // SAFETY: BITMAP is plain data and GetObjectW writes at most its size.
        let mut bm: BITMAP = unsafe { mem::zeroed() };
        let written = unsafe {
            GetObjectW(
                bitmap,
                mem::size_of::<BITMAP>() as i32,
                &mut bm as *mut BITMAP as *mut c_void,
            )
        };
        if written == 0 || bm.bmWidth <= 0 || bm.bmHeight <= 0 {
            return Err(decode_error(path, "icon bitmap has no size"));
        }

        let width = bm.bmWidth as u32;
        let height = bm.bmHeight as u32;
        let mut pixels = vec![0u8; width as usize * height as usize * 4];

        // SAFETY: BITMAPINFO is plain data; only the header is filled in.
        let mut bmi: BITMAPINFO = unsafe { mem::zeroed() };
        bmi.bmiHeader = BITMAPINFOHEADER {
            biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: bm.bmWidth,
            // Negative height asks for top-down rows.
            biHeight: -bm.bmHeight,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB,
            ..bmi.bmiHeader
        };

        // SAFETY: a memory DC is created and released here; `pixels` holds
        // width * height 32-bit pixels as requested in `bmi`.
        let lines = unsafe {
            let dc = CreateCompatibleDC(ptr::null_mut());
            let lines = GetDIBits(
                dc,
                bitmap,
                0,
                height,
                pixels.as_mut_ptr() as *mut c_void,
                &mut bmi,
                DIB_RGB_COLORS,
            );
            DeleteDC(dc);
            lines
        };
        if lines == 0 {
            return Err(decode_error(path, "GetDIBits failed"));
        }

        // BGRA to RGBA.
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        // Icons without an alpha channel come back fully transparent.
        if pixels.chunks_exact(4).all(|px| px[3] == 0) {
            for px in pixels.chunks_exact_mut(4) {
                px[3] = 0xFF;
            }
        }

        Ok(IconImage {
            width,
            height,
            rgba: pixels,
        })
    }
}
