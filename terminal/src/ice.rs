//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! iCE color rewriting.
//!
//! ANSI art made for iCE color displays uses the blink attribute as a fourth background
//! intensity bit. The filter rewrites SGR sequences before they reach the parser: blink
//! (`5`) is dropped and, while it is in effect, normal backgrounds `40`–`47` become bright
//! backgrounds `100`–`107`.

use tracing::trace;

/// Upper bound on a buffered sequence. Longer sequences are passed through untouched.
const MAX_PENDING: usize = 64;

const ESC: char = '\u{1b}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterState {
    Ground,
    Escape,
    Csi,
}

/// Streaming SGR rewriter for iCE colors.
///
/// Text outside of `ESC [ ... m` passes through unchanged. A sequence cut off at the end
/// of a chunk is held back and completed by the next call to [`IceColorFilter::filter`].
#[derive(Clone, Debug)]
pub struct IceColorFilter {
    state: FilterState,
    pending: String,
    blink: bool,
    /// Normal background code (40–47) currently selected, before brightening.
    background: Option<u16>,
}

impl IceColorFilter {
    pub fn new() -> Self {
        IceColorFilter {
            state: FilterState::Ground,
            pending: String::new(),
            blink: false,
            background: None,
        }
    }

    /// Returns to the initial state, discarding any held back sequence.
    pub fn reset(&mut self) {
        self.state = FilterState::Ground;
        self.pending.clear();
        self.blink = false;
        self.background = None;
    }

    /// True while blink is in effect.
    pub fn is_blinking(&self) -> bool {
        self.blink
    }

    /// Text held back because it may be the start of an SGR sequence.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Rewrites `input`, returning the text that is ready for the parser.
    pub fn filter(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        for character in input.chars() {
            self.next(character, &mut output);
        }
        output
    }

    fn next(&mut self, character: char, output: &mut String) {
        match self.state {
            FilterState::Ground => {
                if character == ESC {
                    self.pending.push(character);
                    self.state = FilterState::Escape;
                } else {
                    output.push(character);
                }
            }
            FilterState::Escape => {
                if character == '[' {
                    self.pending.push(character);
                    self.state = FilterState::Csi;
                } else {
                    self.flush(output);
                    self.next(character, output);
                }
            }
            FilterState::Csi => match character {
                '0'..='9' | ';' => {
                    self.pending.push(character);
                    if self.pending.len() > MAX_PENDING {
                        trace!("SGR candidate exceeded {} bytes, passing through", MAX_PENDING);
                        self.flush(output);
                    }
                }
                'm' => {
                    let params = self.pending.split_off(2);
                    self.pending.clear();
                    self.state = FilterState::Ground;
                    self.rewrite(&params, output);
                }
                _ => {
                    // Not an SGR sequence, or not one we understand.
                    self.flush(output);
                    self.next(character, output);
                }
            },
        }
    }

    /// Emits the held back text unchanged and returns to ground.
    fn flush(&mut self, output: &mut String) {
        output.push_str(&self.pending);
        self.pending.clear();
        self.state = FilterState::Ground;
    }

    fn rewrite(&mut self, params: &str, output: &mut String) {
        if params.is_empty() {
            self.blink = false;
            self.background = None;
            output.push_str("\u{1b}[m");
            return;
        }

        let mut rewritten: Vec<String> = Vec::new();
        // Positions in `rewritten` holding a normal background since the last reset.
        let mut backgrounds: Vec<usize> = Vec::new();
        for param in params.split(';') {
            let value = if param.is_empty() { Some(0) } else { param.parse::<u16>().ok() };
            match value {
                Some(0) => {
                    self.blink = false;
                    self.background = None;
                    backgrounds.clear();
                    rewritten.push(param.to_string());
                }
                Some(5) => {
                    if !self.blink {
                        self.blink = true;
                        for index in &backgrounds {
                            if let Some(code) = self.background {
                                rewritten[*index] = (code + 60).to_string();
                            }
                        }
                        if backgrounds.is_empty() {
                            if let Some(code) = self.background {
                                rewritten.push((code + 60).to_string());
                            }
                        }
                    }
                }
                Some(25) => {
                    if self.blink {
                        self.blink = false;
                        if let Some(code) = self.background {
                            rewritten.push(code.to_string());
                        }
                    }
                    rewritten.push(param.to_string());
                }
                Some(code @ 40..=47) => {
                    self.background = Some(code);
                    if self.blink {
                        rewritten.push((code + 60).to_string());
                    } else {
                        backgrounds.clear();
                        backgrounds.push(rewritten.len());
                        rewritten.push(param.to_string());
                    }
                }
                Some(49 | 100..=107) => {
                    self.background = None;
                    backgrounds.clear();
                    rewritten.push(param.to_string());
                }
                _ => rewritten.push(param.to_string()),
            }
        }

        if rewritten.is_empty() {
            return;
        }
        output.push(ESC);
        output.push('[');
        output.push_str(&rewritten.join(";"));
        output.push('m');
    }
}

impl Default for IceColorFilter {
    fn default() -> Self {
        Self::new()
    }
}
