//! Windows input/display driver.
//!
//! Cursor moves and clicks use SendInput with absolute coordinates, which the
//! game's raw-input layer accepts. Keyboard text goes through
//! KEYEVENTF_UNICODE so any character can be typed without a keymap lookup.
//! Screenshots are taken from the desktop DC with GDI BitBlt.

use image::RgbaImage;
use std::time::Duration;

use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
    DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, GetDIBits, ReleaseDC, SRCCOPY, SelectObject,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, MOUSE_EVENT_FLAGS, MOUSEEVENTF_ABSOLUTE,
    MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE, MOUSEINPUT, RegisterHotKey,
    SendInput, VIRTUAL_KEY, VK_CONTROL, VK_RETURN,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetMessageW, GetSystemMetrics, MSG, SM_CXSCREEN, SM_CYSCREEN, WM_HOTKEY,
};

use super::{InputDriver, Key};
use crate::automation::StopSignal;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, ScreenSize};

const HOTKEY_ABORT: i32 = 1;

pub struct WindowsDriver;

impl WindowsDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn send(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(Error::Input(format!(
            "SendInput accepted {} of {} events",
            sent,
            inputs.len()
        )));
    }
    Ok(())
}

fn mouse_input(dx: i32, dy: i32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                dwFlags: flags,
                ..Default::default()
            },
        },
    }
}

fn key_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                ..Default::default()
            },
        },
    }
}

fn virtual_key(key: Key) -> Option<VIRTUAL_KEY> {
    match key {
        Key::Control => Some(VK_CONTROL),
        Key::Enter => Some(VK_RETURN),
        Key::Char(c) if c.is_ascii_alphanumeric() => {
            Some(VIRTUAL_KEY(c.to_ascii_uppercase() as u16))
        }
        Key::Char(_) => None,
    }
}

/// Press and release events for one UTF-16 unit via KEYEVENTF_UNICODE.
fn unicode_events(unit: u16) -> [INPUT; 2] {
    [
        key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE),
        key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP),
    ]
}

impl InputDriver for WindowsDriver {
    fn screen_size(&self) -> Result<ScreenSize> {
        let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        if width <= 0 || height <= 0 {
            return Err(Error::Capture("GetSystemMetrics returned no display".into()));
        }
        Ok(ScreenSize::new(width as u32, height as u32))
    }

    fn cursor_position(&self) -> Result<Point> {
        let mut pt = POINT::default();
        unsafe { GetCursorPos(&mut pt) }.map_err(|e| Error::Input(e.to_string()))?;
        Ok(Point::new(pt.x as f64, pt.y as f64))
    }

    fn set_cursor_position(&self, p: Point) -> Result<()> {
        let screen = self.screen_size()?;
        let (x, y) = p.to_pixel();

        // MOUSEEVENTF_ABSOLUTE takes coordinates on a 0..=65535 grid
        let norm_x = ((x as i64 * 65535) / screen.width as i64) as i32;
        let norm_y = ((y as i64 * 65535) / screen.height as i64) as i32;

        send(&[mouse_input(
            norm_x,
            norm_y,
            MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE,
        )])
    }

    fn click(&self) -> Result<()> {
        send(&[mouse_input(0, 0, MOUSEEVENTF_LEFTDOWN)])?;
        std::thread::sleep(Duration::from_millis(30));
        send(&[mouse_input(0, 0, MOUSEEVENTF_LEFTUP)])
    }

    fn type_text(&self, text: &str, interval: Duration) -> Result<()> {
        for ch in text.chars() {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                send(&unicode_events(*unit))?;
            }
            std::thread::sleep(interval);
        }
        Ok(())
    }

    fn key_chord(&self, keys: &[Key]) -> Result<()> {
        let codes = keys
            .iter()
            .map(|&k| {
                virtual_key(k).ok_or_else(|| Error::Input(format!("no virtual key for {:?}", k)))
            })
            .collect::<Result<Vec<_>>>()?;

        for &vk in &codes {
            send(&[key_input(vk, 0, KEYBD_EVENT_FLAGS(0))])?;
        }
        for &vk in codes.iter().rev() {
            send(&[key_input(vk, 0, KEYEVENTF_KEYUP)])?;
        }
        Ok(())
    }

    fn screenshot(&self, region: Option<Rect>) -> Result<RgbaImage> {
        let (left, top, width, height) = match region {
            Some(r) => {
                let (l, t, w, h) = r.left_top_width_height();
                (l.round() as i32, t.round() as i32, w.round() as i32, h.round() as i32)
            }
            None => {
                let screen = self.screen_size()?;
                (0, 0, screen.width as i32, screen.height as i32)
            }
        };
        if width <= 0 || height <= 0 {
            return Err(Error::Capture(format!(
                "empty capture region {}x{}",
                width, height
            )));
        }

        let mut bgra = vec![0u8; (width * height * 4) as usize];

        unsafe {
            let screen_dc = GetDC(HWND::default());
            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            let previous = SelectObject(mem_dc, bitmap);

            let blit = BitBlt(mem_dc, 0, 0, width, height, screen_dc, left, top, SRCCOPY);

            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    // Negative height requests a top-down DIB
                    biHeight: -height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };
            let lines = GetDIBits(
                mem_dc,
                bitmap,
                0,
                height as u32,
                Some(bgra.as_mut_ptr() as *mut _),
                &mut info,
                DIB_RGB_COLORS,
            );

            SelectObject(mem_dc, previous);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(HWND::default(), screen_dc);

            blit.map_err(|e| Error::Capture(format!("BitBlt failed: {}", e)))?;
            if lines != height {
                return Err(Error::Capture(format!(
                    "GetDIBits copied {} of {} lines",
                    lines, height
                )));
            }
        }

        // Convert BGRA to RGBA, forcing opaque alpha
        for px in bgra.chunks_exact_mut(4) {
            px.swap(0, 2);
            px[3] = 255;
        }

        RgbaImage::from_raw(width as u32, height as u32, bgra)
            .ok_or_else(|| Error::Capture("capture buffer size mismatch".into()))
    }
}

/// Starts a background thread listening for Ctrl+Shift+Q; pressing it
/// requests a stop of the running capture or replay.
pub fn start_stop_hotkey(stop: StopSignal) {
    std::thread::spawn(move || unsafe {
        if let Err(e) = RegisterHotKey(
            HWND::default(),
            HOTKEY_ABORT,
            MOD_CONTROL | MOD_SHIFT | MOD_NOREPEAT,
            0x51, // 'Q' key
        ) {
            crate::log(&format!("Failed to register stop hotkey Ctrl+Shift+Q: {}", e));
            return;
        }
        crate::log("Hotkey: Ctrl+Shift+Q (stop)");

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
            if msg.message == WM_HOTKEY && msg.wParam.0 == HOTKEY_ABORT as usize {
                crate::log("Stop hotkey pressed");
                stop.request();
            }
        }
    });
}
