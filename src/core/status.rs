//! Status codes for the integration loop

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Interrupted,
    NeedLargerNMax,
}
