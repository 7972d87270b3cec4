/// Audio filter presets offered in the UI.
///
/// Each preset maps to an FFmpeg `-af` fragment that is prepended to the fade
/// filters. Fragments are either empty or end with a `,` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPreset {
    #[default]
    None,
    Loud,
    Normal,
    Quiet,
    Brighter,
    Bassier,
    VolumeUp,
    VolumeDown,
    DynAudNorm,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 9] = [
        FilterPreset::None,
        FilterPreset::Loud,
        FilterPreset::Normal,
        FilterPreset::Quiet,
        FilterPreset::Brighter,
        FilterPreset::Bassier,
        FilterPreset::VolumeUp,
        FilterPreset::VolumeDown,
        FilterPreset::DynAudNorm,
    ];

    /// Unrecognised keys (including the empty string) select no filter.
    pub fn from_key(key: &str) -> Self {
        match key {
            "loud" => FilterPreset::Loud,
            "normal" => FilterPreset::Normal,
            "quiet" => FilterPreset::Quiet,
            "brighter" => FilterPreset::Brighter,
            "bassier" => FilterPreset::Bassier,
            "volume_up" => FilterPreset::VolumeUp,
            "volume_down" => FilterPreset::VolumeDown,
            "dynaudnorm" => FilterPreset::DynAudNorm,
            _ => FilterPreset::None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            FilterPreset::None => "none",
            FilterPreset::Loud => "loud",
            FilterPreset::Normal => "normal",
            FilterPreset::Quiet => "quiet",
            FilterPreset::Brighter => "brighter",
            FilterPreset::Bassier => "bassier",
            FilterPreset::VolumeUp => "volume_up",
            FilterPreset::VolumeDown => "volume_down",
            FilterPreset::DynAudNorm => "dynaudnorm",
        }
    }

    pub fn filter_expression(self) -> &'static str {
        match self {
            // Loudness targets in LUFS, true peak in dBTP
            FilterPreset::Loud => "loudnorm=I=-11:LRA=7:TP=-1,alimiter=limit=0.9,",
            FilterPreset::Normal => "loudnorm=I=-14:LRA=7:TP=-2,alimiter=limit=0.9,",
            FilterPreset::Quiet => "loudnorm=I=-19:LRA=7:TP=-3,alimiter=limit=0.9,",
            FilterPreset::Brighter => "treble=g=3,",
            FilterPreset::Bassier => "bass=g=3,",
            FilterPreset::VolumeUp => "volume=1.5,",
            FilterPreset::VolumeDown => "volume=0.5,",
            FilterPreset::DynAudNorm => "dynaudnorm=f=250:g=8,",
            FilterPreset::None => "",
        }
    }
}

/// Filter fragment for a raw preset key as it comes from a UI control or CLI flag.
pub fn filter_for_key(key: &str) -> &'static str {
    FilterPreset::from_key(key).filter_expression()
}
