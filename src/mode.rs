//! Menu actions and download modes.

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    DownloadVideo,
    DownloadAudio,
    Exit,
}

impl MenuAction {
    pub const ALL: [Self; 3] = [Self::DownloadVideo, Self::DownloadAudio, Self::Exit];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DownloadVideo => "Download Video (MP4)",
            Self::DownloadAudio => "Download Audio (MP3)",
            Self::Exit => "Exit",
        }
    }

    /// Download modes offered once metadata for this action has resolved.
    #[must_use]
    pub const fn modes(self) -> &'static [DownloadMode] {
        match self {
            Self::DownloadVideo | Self::Exit => &DownloadMode::ALL,
            Self::DownloadAudio => &[DownloadMode::AudioOnly],
        }
    }
}

/// Quality and format selection handed to the external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Best,
    Hd1080,
    Hd720,
    AudioOnly,
}

impl DownloadMode {
    pub const ALL: [Self; 4] = [Self::Best, Self::Hd1080, Self::Hd720, Self::AudioOnly];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Best => "Best Quality (MP4)",
            Self::Hd1080 => "1080p (MP4)",
            Self::Hd720 => "720p (MP4)",
            Self::AudioOnly => "Audio Only (MP3)",
        }
    }

    /// Format selection arguments for the external tool.
    #[must_use]
    pub const fn args(self) -> &'static [&'static str] {
        match self {
            Self::Best => &["-f", "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"],
            Self::Hd1080 => &[
                "-f",
                "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]/best",
            ],
            Self::Hd720 => &[
                "-f",
                "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]/best",
            ],
            Self::AudioOnly => &["-x", "--audio-format", "mp3"],
        }
    }
}
