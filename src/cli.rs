// ============================================================================
// quadview CLI — command-line configuration
// ============================================================================
//
// Usage examples:
//   quadview photo.ppm
//   quadview photo.ppm --width 1280 --height 720 --smooth
//   quadview photo.ppm --pan-mode replace
//   quadview photo.ppm --info                 (decode + print, no window)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::gpu::Filtering;
use crate::ppm::PixelBuffer;
use crate::transform::PanMode;

/// Minimal binary PPM (P6) viewer.
///
/// Keys: Q/E rotate, W/A/S/D pan, X/Z shear horizontally, V/C shear
/// vertically, N/M scale up/down, R reset, Esc quit.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "quadview",
    version,
    about = "View a binary PPM (P6) image and pan, rotate, shear or scale it"
)]
pub struct CliArgs {
    /// Image to open (binary PPM, maxval 255).
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// How panning combines with rotation, shear and scale.
    #[arg(long, value_enum, default_value_t = PanModeArg::Layered)]
    pub pan_mode: PanModeArg,

    /// Sample the image with linear filtering instead of nearest-neighbour.
    #[arg(long)]
    pub smooth: bool,

    /// Decode the image, print its dimensions and exit without opening a window.
    #[arg(long)]
    pub info: bool,

    /// Do not write a session log file.
    #[arg(long)]
    pub no_log: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanModeArg {
    /// Pan moves the view without disturbing rotation, shear or scale.
    Layered,
    /// Pan resets the view to a pure translation (classic behaviour).
    Replace,
}

impl From<PanModeArg> for PanMode {
    fn from(arg: PanModeArg) -> Self {
        match arg {
            PanModeArg::Layered => PanMode::Layered,
            PanModeArg::Replace => PanMode::Replace,
        }
    }
}

impl CliArgs {
    pub fn filtering(&self) -> Filtering {
        if self.smooth {
            Filtering::Linear
        } else {
            Filtering::Nearest
        }
    }

    /// Window title: the image's file name, falling back to the full path.
    pub fn window_title(&self) -> String {
        let name = self
            .image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image.display().to_string());
        format!("{name} - quadview")
    }
}

/// One-line summary printed by `--info`.
pub fn describe(args: &CliArgs, image: &PixelBuffer) -> String {
    format!(
        "{}: P6 {}x{}, {} pixels, {} bytes RGBA",
        args.image.display(),
        image.width(),
        image.height(),
        image.pixels().len(),
        image.as_rgba_bytes().len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["quadview", "cat.ppm"]).unwrap();
        assert_eq!(args.image, PathBuf::from("cat.ppm"));
        assert_eq!((args.width, args.height), (640, 480));
        assert_eq!(PanMode::from(args.pan_mode), PanMode::Layered);
        assert_eq!(args.filtering(), Filtering::Nearest);
        assert!(!args.info && !args.no_log);
    }

    #[test]
    fn all_flags() {
        let args = CliArgs::try_parse_from([
            "quadview", "dir/cat.ppm", "--width", "800", "--height", "600",
            "--pan-mode", "replace", "--smooth", "--info", "--no-log",
        ])
        .unwrap();
        assert_eq!((args.width, args.height), (800, 600));
        assert_eq!(PanMode::from(args.pan_mode), PanMode::Replace);
        assert_eq!(args.filtering(), Filtering::Linear);
        assert!(args.info && args.no_log);
        assert_eq!(args.window_title(), "cat.ppm - quadview");
    }

    #[test]
    fn image_is_required_and_sizes_positive() {
        assert!(CliArgs::try_parse_from(["quadview"]).is_err());
        assert!(CliArgs::try_parse_from(["quadview", "a.ppm", "--width", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["quadview", "a.ppm", "--pan-mode", "sideways"]).is_err());
    }

    #[test]
    fn describe_reports_dimensions() {
        let args = CliArgs::try_parse_from(["quadview", "a.ppm"]).unwrap();
        let image = crate::ppm::decode(Cursor::new(&b"P6 2 1 255\n\x00\x00\x00\x01\x01\x01"[..])).unwrap();
        assert_eq!(describe(&args, &image), "a.ppm: P6 2x1, 2 pixels, 8 bytes RGBA");
    }
}
