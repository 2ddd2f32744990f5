use std::path::{Path, PathBuf};

use crate::shared::constants::{
    GENERIC_QUALITY, MODERN_ENCODER_MAJOR, PIXEL_FORMAT, PRIMARY_CODEC, PRIMARY_CRF, WEBM_CODEC,
    WEBM_CRF,
};

/// Output container, chosen from the output file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Mp4,
    Webm,
    Avi,
}

impl ContainerKind {
    /// Case-insensitive extension match. Unknown or missing extensions
    /// are encoded as MP4.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("webm") => ContainerKind::Webm,
            Some("avi") => ContainerKind::Avi,
            _ => ContainerKind::Mp4,
        }
    }
}

/// Coarse capability bucket of the external encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionTier {
    /// Version below 5, or not determinable.
    Legacy,
    /// Version 5 or newer: preset and faststart arguments are accepted.
    Modern,
}

impl VersionTier {
    pub fn from_major(major: Option<u32>) -> Self {
        match major {
            Some(v) if v >= MODERN_ENCODER_MAJOR => VersionTier::Modern,
            _ => VersionTier::Legacy,
        }
    }
}

/// Which codec arguments the plan carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecPath {
    /// The primary software codec with a fixed CRF.
    Primary,
    /// The encoder's default codec driven by a generic quality scale, used
    /// when the primary codec is missing from the tool's build.
    GenericQuality,
    /// The fixed WebM codec; never substituted.
    Alternate,
}

/// Resolved arguments for one run's primary encode attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderPlan {
    pub container: ContainerKind,
    pub codec: CodecPath,
    pub tier: VersionTier,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub output_path: PathBuf,
}

impl EncoderPlan {
    /// Encoder arguments (without the program name) that turn the numbered
    /// image sequence `input_pattern` into the planned output.
    pub fn build_command(&self, input_pattern: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-framerate".into(),
            self.fps.to_string(),
            "-i".into(),
            input_pattern.to_string_lossy().into_owned(),
        ];
        args.extend(codec_args(self.codec).iter().map(|a| a.to_string()));
        args.extend([
            "-pix_fmt".to_string(),
            PIXEL_FORMAT.to_string(),
            "-vf".to_string(),
            format!("scale={}:{}", self.width, self.height),
        ]);
        args.extend(tier_args(self.container, self.tier).iter().map(|a| a.to_string()));
        args.push(self.output_path.to_string_lossy().into_owned());
        args
    }
}

fn codec_args(codec: CodecPath) -> &'static [&'static str] {
    match codec {
        CodecPath::Primary => &["-c:v", PRIMARY_CODEC, "-crf", PRIMARY_CRF],
        CodecPath::GenericQuality => &["-q:v", GENERIC_QUALITY],
        CodecPath::Alternate => &["-c:v", WEBM_CODEC, "-crf", WEBM_CRF, "-b:v", "0"],
    }
}

fn tier_args(container: ContainerKind, tier: VersionTier) -> &'static [&'static str] {
    match (container, tier) {
        (ContainerKind::Mp4, VersionTier::Modern) => {
            &["-preset", "medium", "-movflags", "+faststart"]
        }
        (ContainerKind::Avi, VersionTier::Modern) => &["-preset", "medium"],
        (ContainerKind::Webm, _) | (_, VersionTier::Legacy) => &[],
    }
}

/// Extracts the major version from the first line of the encoder's version
/// report, e.g. `"ffmpeg version 5.1.2 Copyright ..."` gives 5. Git builds
/// that prefix the number with `n` are accepted.
pub fn parse_major_version(first_line: &str) -> Option<u32> {
    let mut tokens = first_line.split_whitespace();
    tokens.find(|t| t.eq_ignore_ascii_case("version"))?;
    let token = tokens.next()?;
    let token = token.strip_prefix('n').unwrap_or(token);
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn plan(output: &str, codec: CodecPath, tier: VersionTier) -> EncoderPlan {
        EncoderPlan {
            container: ContainerKind::from_path(Path::new(output)),
            codec,
            tier,
            fps: 24.0,
            width: 640,
            height: 360,
            output_path: PathBuf::from(output),
        }
    }

    fn contains_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[rstest]
    #[case("out.mp4", ContainerKind::Mp4)]
    #[case("OUT.MP4", ContainerKind::Mp4)]
    #[case("clip.webm", ContainerKind::Webm)]
    #[case("clip.WebM", ContainerKind::Webm)]
    #[case("clip.avi", ContainerKind::Avi)]
    #[case("clip.mov", ContainerKind::Mp4)]
    #[case("clip", ContainerKind::Mp4)]
    fn test_container_from_extension(#[case] path: &str, #[case] expected: ContainerKind) {
        assert_eq!(ContainerKind::from_path(Path::new(path)), expected);
    }

    #[rstest]
    #[case(None, VersionTier::Legacy)]
    #[case(Some(4), VersionTier::Legacy)]
    #[case(Some(5), VersionTier::Modern)]
    #[case(Some(7), VersionTier::Modern)]
    fn test_version_tier(#[case] major: Option<u32>, #[case] expected: VersionTier) {
        assert_eq!(VersionTier::from_major(major), expected);
    }

    #[rstest]
    #[case("ffmpeg version 4.2.7-0ubuntu0.1 Copyright (c) 2000-2022", Some(4))]
    #[case("ffmpeg version 5.1.2 Copyright (c) 2000-2022", Some(5))]
    #[case("ffmpeg version n6.1.1 Copyright", Some(6))]
    #[case("ffmpeg version N-111111-gabcdef Copyright", None)]
    #[case("ffmpeg version", None)]
    #[case("", None)]
    #[case("something else entirely", None)]
    fn test_parse_major_version(#[case] line: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_major_version(line), expected);
    }

    #[test]
    fn test_webm_uses_alternate_codec() {
        let args = plan("out.webm", CodecPath::Alternate, VersionTier::Modern)
            .build_command(Path::new("/tmp/f/frame_%06d.png"));
        assert!(contains_pair(&args, "-c:v", WEBM_CODEC));
        assert!(contains_pair(&args, "-crf", "30"));
        assert!(contains_pair(&args, "-b:v", "0"));
        assert!(!args.iter().any(|a| a == PRIMARY_CODEC || a == "-q:v"));
        assert!(!args.iter().any(|a| a == "-preset" || a == "-movflags"));
    }

    #[test]
    fn test_mp4_legacy_has_no_tier_flags() {
        let args = plan("out.mp4", CodecPath::Primary, VersionTier::Legacy)
            .build_command(Path::new("frame_%06d.png"));
        assert!(contains_pair(&args, "-c:v", PRIMARY_CODEC));
        assert!(contains_pair(&args, "-crf", "23"));
        assert!(!args.iter().any(|a| a == "-preset" || a == "-movflags"));
    }

    #[test]
    fn test_mp4_modern_has_preset_and_faststart() {
        let args = plan("out.mp4", CodecPath::Primary, VersionTier::Modern)
            .build_command(Path::new("frame_%06d.png"));
        assert!(contains_pair(&args, "-preset", "medium"));
        assert!(contains_pair(&args, "-movflags", "+faststart"));
    }

    #[test]
    fn test_avi_modern_has_preset_only() {
        let args = plan("out.avi", CodecPath::Primary, VersionTier::Modern)
            .build_command(Path::new("frame_%06d.png"));
        assert!(contains_pair(&args, "-preset", "medium"));
        assert!(!args.iter().any(|a| a == "-movflags"));
    }

    #[test]
    fn test_generic_quality_replaces_primary_codec() {
        let args = plan("out.mp4", CodecPath::GenericQuality, VersionTier::Legacy)
            .build_command(Path::new("frame_%06d.png"));
        assert!(contains_pair(&args, "-q:v", "3"));
        assert!(!args.iter().any(|a| a == "-c:v" || a == PRIMARY_CODEC));
    }

    #[rstest]
    #[case("out.mp4", CodecPath::Primary)]
    #[case("out.avi", CodecPath::GenericQuality)]
    #[case("out.webm", CodecPath::Alternate)]
    fn test_common_arguments(#[case] output: &str, #[case] codec: CodecPath) {
        let args = plan(output, codec, VersionTier::Legacy)
            .build_command(Path::new("/tmp/frames/frame_%06d.png"));
        assert_eq!(args[0], "-y");
        assert!(contains_pair(&args, "-framerate", "24"));
        assert!(contains_pair(&args, "-i", "/tmp/frames/frame_%06d.png"));
        assert!(contains_pair(&args, "-pix_fmt", "yuv420p"));
        assert!(contains_pair(&args, "-vf", "scale=640:360"));
        assert_eq!(args.last().unwrap(), output);
    }

    #[test]
    fn test_fractional_fps_is_preserved() {
        let mut p = plan("out.mp4", CodecPath::Primary, VersionTier::Legacy);
        p.fps = 29.97;
        let args = p.build_command(Path::new("frame_%06d.png"));
        assert!(contains_pair(&args, "-framerate", "29.97"));
    }
}
