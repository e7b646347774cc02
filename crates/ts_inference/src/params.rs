use ts_core::{DecodingParameters, TargetLength};

/// Lowest `max_length` ever sent upstream.
pub const MAX_LENGTH_FLOOR: u32 = 150;

const BEAM_COUNT: u32 = 2;
const NO_REPEAT_NGRAM_SIZE: u32 = 2;

struct Preset {
    max_length: u32,
    min_length: u32,
    length_penalty: f64,
}

fn preset(target: TargetLength) -> Preset {
    match target {
        TargetLength::Short => Preset { max_length: 250, min_length: 80, length_penalty: 1.0 },
        TargetLength::Medium => Preset { max_length: 350, min_length: 120, length_penalty: 1.2 },
        TargetLength::Long => Preset { max_length: 450, min_length: 160, length_penalty: 1.5 },
    }
}

pub fn select_parameters(target: TargetLength) -> DecodingParameters {
    let preset = preset(target);
    let max_length = preset.max_length.max(MAX_LENGTH_FLOOR);
    DecodingParameters {
        max_length,
        min_length: preset.min_length.min(max_length - 1),
        length_penalty: preset.length_penalty,
        beam_count: BEAM_COUNT,
        no_repeat_ngram_size: NO_REPEAT_NGRAM_SIZE,
        deterministic: true,
    }
}
