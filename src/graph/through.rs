use crate::config::ProcessConfig;
use crate::graph::node::Effect;
use crate::Result;

/*
Serial Effect Chain
===================

Chain connects two effects in series: the first rewrites the channel
buffers in place, then the second rewrites them again.

    input ──→ [ first ] ──→ [ second ] ──→ output
       buffer ─────────────────────────→
       (same buffers, modified at each stage)

No scratch buffers are needed, so chaining costs nothing beyond the two
effects themselves.

Parameters
----------

A chain's parameters are the pair `(first, second)`. Through `ParamSet`
the host sees the first effect's slots followed by the second's, so a
chain of chains is still one flat value array.

Common Use Cases
----------------

    // Filter the echoes
    let dub = AutoFilterEffect::new().chain(EchoEffect::new());

    // Thicken, then place in a room
    let wash = ChorusEffect::new().chain(ReverbEffect::new());

Tail
----

The second effect keeps ringing on whatever the first one is still
producing, so the tails add. If either never stops, the chain never stops.
*/

#[derive(Debug, Clone, Default)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<A: Effect, B: Effect> Effect for Chain<A, B> {
    type Params = (A::Params, B::Params);

    fn prepare(&mut self, config: &ProcessConfig) -> Result<()> {
        self.first.prepare(config)?;
        self.second.prepare(config)
    }

    fn process(&mut self, channels: &mut [&mut [f32]], params: &Self::Params) {
        self.first.process(channels, &params.0);
        self.second.process(channels, &params.1);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn tail_samples(&self, params: &Self::Params) -> Option<usize> {
        let first = self.first.tail_samples(&params.0)?;
        let second = self.second.tail_samples(&params.1)?;
        Some(first + second)
    }
}
