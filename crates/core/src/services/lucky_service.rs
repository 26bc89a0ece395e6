use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::storage::encryption::random_bytes;
use crate::storage::local::{LocalAdapter, LUCKY_DRAW_KEY};

pub const LUCKY_ITEMS: [&str; 18] = [
    "Ballpoint pen",
    "Transit card",
    "Coin",
    "Keychain",
    "Bubble tea cup",
    "Tissues",
    "Phone case",
    "Hair tie",
    "Water bottle",
    "Sticky notes",
    "Lip balm",
    "Face mask",
    "Tote bag",
    "Charging cable",
    "Nail clipper",
    "Earphones",
    "Lens cloth",
    "Notebook",
];

pub const LUCKY_COLORS: [&str; 8] = [
    "Sapphire blue",
    "Energetic orange",
    "Lucky red",
    "Fresh green",
    "Warm yellow",
    "Mystic purple",
    "Minimal grey",
    "Pure white",
];

/// The day's lucky item and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyDraw {
    pub date: NaiveDate,
    pub item: String,
    pub color: String,
}

/// One draw per day, remembered in local storage.
pub struct LuckyService;

impl LuckyService {
    pub fn new() -> Self {
        Self
    }

    /// Today's draw if one was already made, otherwise a fresh one (persisted).
    pub fn draw(&self, local: &LocalAdapter, today: NaiveDate) -> Result<LuckyDraw, CoreError> {
        if let Some(existing) = self.stored(local, today) {
            return Ok(existing);
        }
        let draw = LuckyDraw {
            date: today,
            item: pick(&LUCKY_ITEMS)?.to_string(),
            color: pick(&LUCKY_COLORS)?.to_string(),
        };
        local.save(LUCKY_DRAW_KEY, &draw)?;
        Ok(draw)
    }

    /// The stored draw, only if it was made on `today`.
    pub fn stored(&self, local: &LocalAdapter, today: NaiveDate) -> Option<LuckyDraw> {
        local
            .load::<Option<LuckyDraw>>(LUCKY_DRAW_KEY, None)
            .filter(|d| d.date == today)
    }
}

impl Default for LuckyService {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<'a>(options: &[&'a str]) -> Result<&'a str, CoreError> {
    let bytes: [u8; 8] = random_bytes()?;
    let idx = (u64::from_le_bytes(bytes) % options.len() as u64) as usize;
    Ok(options[idx])
}
