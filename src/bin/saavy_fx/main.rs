//! saavy-fx - audition the effects on a test signal
//!
//! Run with: cargo run -- [echo|reverb|chorus|filter|dub|wash]

mod app;
mod source;
mod ui;

use app::Audition;
use color_eyre::eyre::eyre;
use saavy_fx::graph::{
    AutoFilterEffect, ChorusEffect, EchoEffect, EffectExt, HostEffect, ReverbEffect,
};

const EFFECTS: [&str; 6] = ["echo", "reverb", "chorus", "filter", "dub", "wash"];

fn effect_by_name(name: &str) -> Option<Box<dyn HostEffect>> {
    let effect = match name {
        "echo" => EchoEffect::new().boxed(),
        "reverb" => ReverbEffect::new().boxed(),
        "chorus" => ChorusEffect::new().boxed(),
        "filter" => AutoFilterEffect::new().boxed(),
        "dub" => AutoFilterEffect::new().chain(EchoEffect::new()).boxed(),
        "wash" => ChorusEffect::new().chain(ReverbEffect::new()).boxed(),
        _ => return None,
    };
    Some(effect)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "reverb".to_string());
    let effect = effect_by_name(&name)
        .ok_or_else(|| eyre!("unknown effect '{name}', expected one of: {}", EFFECTS.join(", ")))?;

    Audition::new(name, effect).run()
}
