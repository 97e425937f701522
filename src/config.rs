use chrono::Local;
use clap::Parser;
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, long_about = None)]
struct CliArgs {
    /// The directory path where the rendered file is placed. The default is the XDG user image path
    #[arg(short = 'p', long)]
    path: Option<PathBuf>,

    /// Output file name, supports time formatting placeholders (such as %Y, %m, %d, %H, %M, %S)
    #[arg(short = 'n', long, default_value_t = Self::default_name())]
    name: String,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 640)]
    width: i32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 400)]
    height: i32,

    /// Render onto an opaque depth-24 drawable instead of a depth-32 one
    #[arg(long, default_value_t = false)]
    opaque: bool,

    /// JPEG quality, used when the output name ends in .jpg
    #[arg(long, default_value_t = 90)]
    quality: u8,
}

impl CliArgs {
    fn default_name() -> String {
        format!("platen-{}.png", Local::now().format("%Y-%m-%d-%H-%M-%S"))
    }
}

#[derive(Default, Debug, Clone)]
pub enum ImageType {
    #[default]
    Png,
    Jpg,
}

#[derive(Debug)]
pub struct DemoConfig {
    pub output_path: PathBuf,
    /// Output type, defaults to png
    pub image_type: ImageType,
    pub width: i32,
    pub height: i32,
    pub opaque: bool,
    pub quality: u8,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConfig {
    pub fn new() -> Self {
        let args = CliArgs::parse();

        let formatted_path =
            Self::format_path(args.path.unwrap_or(Self::generate_default_output_path()));
        let formatted_name = Self::replace_time_specifiers(&args.name);
        let (final_path, final_name) = Self::validate_path(&formatted_path, &formatted_name);
        let mut output_path = final_path;
        output_path.push(final_name);

        let image_type = Self::detect_image_type(&mut output_path);

        DemoConfig {
            output_path,
            image_type,
            width: args.width,
            height: args.height,
            opaque: args.opaque,
            quality: args.quality,
        }
    }

    fn format_path(path: PathBuf) -> PathBuf {
        let path_str = path.to_string_lossy().to_string();
        PathBuf::from(Self::replace_time_specifiers(&path_str))
    }

    fn replace_time_specifiers(path_str: &str) -> String {
        let now = Local::now();
        let mut formatted = path_str.to_string();

        for spec in ["%Y", "%m", "%d", "%H", "%M", "%S"] {
            formatted = formatted.replace(spec, &now.format(spec).to_string());
        }

        formatted
    }

    fn generate_default_output_path() -> PathBuf {
        UserDirs::new()
            .and_then(|ud| ud.picture_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate_path(dir_path: &PathBuf, filename: &str) -> (PathBuf, String) {
        let final_path = if !dir_path.exists() {
            match fs::create_dir_all(dir_path) {
                Ok(_) => dir_path.clone(),
                Err(_) => Self::generate_default_output_path(),
            }
        } else {
            dir_path.clone()
        };

        let absolute_path = fs::canonicalize(&final_path).unwrap_or_else(|_| final_path.clone());

        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("platen");

        let ext = Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("png");

        // suffix a counter while the name collides
        let mut final_name = String::from(filename);
        let mut counter = 0;
        while absolute_path.join(&final_name).exists() {
            counter += 1;
            final_name = format!("{}-{}.{}", stem, counter, ext);
        }

        (absolute_path, final_name)
    }

    fn detect_image_type(path: &mut PathBuf) -> ImageType {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => match ext.to_lowercase().as_str() {
                "jpg" | "jpeg" => ImageType::Jpg,
                "png" => ImageType::Png,
                _ => {
                    Self::force_png_extension(path);
                    ImageType::Png
                }
            },
            None => {
                Self::force_png_extension(path);
                ImageType::Png
            }
        }
    }

    fn force_png_extension(path: &mut PathBuf) {
        if let Some(parent) = path.parent() {
            let mut new_path = parent.to_path_buf();
            match path.file_stem() {
                Some(file_stem) => {
                    new_path.push(format!("{}.png", file_stem.to_string_lossy()));
                }
                None => new_path.push("render.png"),
            }
            *path = new_path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_specifiers_are_replaced() {
        let formatted = DemoConfig::replace_time_specifiers("shot-%Y-%m-%d.png");
        assert!(!formatted.contains('%'));
        assert!(formatted.starts_with("shot-"));
    }

    #[test]
    fn jpg_extension_is_detected() {
        let mut path = PathBuf::from("/tmp/out.JPG");
        assert!(matches!(
            DemoConfig::detect_image_type(&mut path),
            ImageType::Jpg
        ));
        assert_eq!(path, PathBuf::from("/tmp/out.JPG"));
    }

    #[test]
    fn unknown_extension_falls_back_to_png() {
        let mut path = PathBuf::from("/tmp/out.webp");
        assert!(matches!(
            DemoConfig::detect_image_type(&mut path),
            ImageType::Png
        ));
        assert_eq!(path, PathBuf::from("/tmp/out.png"));
    }
}
