//! Recorded input sequences
//!
//! A seed plus the inputs fed to the lock reproduce a session exactly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LockError;
use crate::sim::{LockInput, LockState, Seed, apply_input};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySequence {
    pub seed: u32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub input: LockInput,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// Record a flat input list, folding runs of identical inputs
    pub fn record(seed: Seed, inputs: &[LockInput]) -> Self {
        let mut frames: Vec<ReplayFrame> = Vec::new();
        for input in inputs {
            match frames.last_mut() {
                Some(last) if last.input == *input => last.repeat += 1,
                _ => frames.push(ReplayFrame {
                    input: *input,
                    repeat: 1,
                }),
            }
        }
        Self {
            seed: seed.get(),
            frames,
        }
    }

    pub fn expanded_inputs(&self) -> Vec<LockInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.input);
            }
        }
        out
    }

    /// Replay from a fresh session
    pub fn run(&self) -> Result<LockState, LockError> {
        let mut state = LockState::from_seed(Seed::new(self.seed)?);
        for input in self.expanded_inputs() {
            apply_input(&mut state, &input);
        }
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, LockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LockError> {
    let raw = fs::read_to_string(path).map_err(|err| LockError::io(path, err))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), LockError> {
    if replay.seed == 0 {
        return Err(LockError::InvalidReplay("seed must be nonzero".to_string()));
    }
    if replay.frames.is_empty() {
        return Err(LockError::InvalidReplay("frames list is empty".to_string()));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}
