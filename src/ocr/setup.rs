use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};
use crate::log;

/// Executable name on this platform.
#[cfg(target_os = "windows")]
const TESSERACT_EXE: &str = "tesseract.exe";
#[cfg(not(target_os = "windows"))]
const TESSERACT_EXE: &str = "tesseract";

/// Common install locations checked after PATH.
#[cfg(target_os = "windows")]
const COMMON_INSTALLS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];
#[cfg(not(target_os = "windows"))]
const COMMON_INSTALLS: &[&str] = &["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"];

/// Common tessdata locations checked after the local directory.
#[cfg(target_os = "windows")]
const COMMON_TESSDATA: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];
#[cfg(not(target_os = "windows"))]
const COMMON_TESSDATA: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
];

pub struct TesseractPaths {
    pub executable: PathBuf,
    /// `None` lets Tesseract use its compiled-in data path
    pub tessdata: Option<PathBuf>,
}

/// Returns the directory for a locally provided Tesseract
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sens-copy")
        .join("tesseract")
}

/// Locates Tesseract and its English data. Call once at startup.
pub fn ensure_tesseract() -> Result<TesseractPaths> {
    let executable = find_tesseract_executable()?;
    log(&format!("Tesseract found at: {}", executable.display()));

    let tessdata = match find_tessdata_dir() {
        Some(dir) => {
            log(&format!("tessdata found at: {}", dir.display()));
            Some(dir)
        }
        None => {
            log("tessdata not found; relying on Tesseract's default data path");
            None
        }
    };

    Ok(TesseractPaths {
        executable,
        tessdata,
    })
}

/// Locates `tesseract`: the bundled copy next to the binary, then PATH, then
/// the usual install folders.
pub fn find_tesseract_executable() -> Result<PathBuf> {
    let local_exe = get_tesseract_dir().join(TESSERACT_EXE);
    if local_exe.exists() {
        return Ok(local_exe);
    }

    // A bare `tesseract` resolves through PATH
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for dir in COMMON_INSTALLS {
        let p = PathBuf::from(dir).join(TESSERACT_EXE);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(Error::Ocr(format!(
        "Tesseract not found. Install Tesseract-OCR, add it to PATH, \
         or place {} in {}",
        TESSERACT_EXE,
        get_tesseract_dir().display()
    )))
}

/// Finds a tessdata directory holding eng.traineddata
pub fn find_tessdata_dir() -> Option<PathBuf> {
    let local_tessdata = get_tesseract_dir().join("tessdata");
    if local_tessdata.join("eng.traineddata").exists() {
        return Some(local_tessdata);
    }

    for path in COMMON_TESSDATA {
        let p = PathBuf::from(path);
        if p.join("eng.traineddata").exists() {
            return Some(p);
        }
    }

    // TESSDATA_PREFIX may name tessdata itself or its parent
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let p = PathBuf::from(&prefix);
        if p.join("eng.traineddata").exists() {
            return Some(p);
        }
        let p = p.join("tessdata");
        if p.join("eng.traineddata").exists() {
            return Some(p);
        }
    }

    None
}
