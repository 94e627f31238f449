// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Shared fixtures for driving the terminal surfaces in unit tests
use crate::terminal::{SharedInput, SharedOutput};
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

/// Writer that keeps everything written to it.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    /// A shared output handle that writes into this capture.
    pub fn output(&self) -> SharedOutput {
        Arc::new(Mutex::new(Box::new(self.clone())))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Input handle that yields `script` and then end of input.
pub fn scripted_input(script: &str) -> SharedInput {
    Arc::new(Mutex::new(Box::new(Cursor::new(script.as_bytes().to_vec()))))
}
