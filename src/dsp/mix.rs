//! Dry/wet blending.

/*
Dry / Wet
=========

Every effect in this crate ends the same way: the processed (wet) signal is
blended back with the untouched input (dry) by a mix control.

    output = dry × (1 - mix) + wet × mix

  mix = 0.0   dry only, the effect is bypassed
  mix = 0.5   equal parts
  mix = 1.0   wet only

The weights sum to 1.0, so two full-scale signals cannot add up past
full scale. This is a linear crossfade; uncorrelated dry and wet dip by
about 3 dB at the midpoint, which is accepted here.

The mix control is smoothed per sample before it reaches these helpers, so
sweeping it does not click.
*/

#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Blend `dry` into `wet` in place with a fixed mix.
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());

    let mix = mix.clamp(0.0, 1.0);
    if mix >= 1.0 {
        return;
    }
    for (wet_sample, &dry_sample) in wet.iter_mut().zip(dry) {
        *wet_sample = blend_dry_wet(dry_sample, *wet_sample, mix);
    }
}
