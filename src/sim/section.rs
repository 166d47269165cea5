//! Section descriptors
//!
//! A section is a small bitmap of level layout. Each pixel is one grid cell;
//! a pixel is solid iff its RGB equals `SOLID`. Decoding turns it into a list
//! of occupied columns per pixel row, top row first. The top of the bitmap is
//! the next terrain the player falls into.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SectionError;

pub type Rgb = [u8; 3];

/// Sentinel color for a solid cell
pub const SOLID: Rgb = [0, 0, 0];
/// Background used by `from_ascii`
pub const EMPTY: Rgb = [255, 255, 255];

/// Rectangular RGB bitmap, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct SectionBitmap {
    pub name: String,
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

/// Unchecked wire form; deserialization goes through `SectionBitmap::new`
#[derive(Deserialize)]
struct RawSection {
    #[serde(default)]
    name: String,
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl TryFrom<RawSection> for SectionBitmap {
    type Error = SectionError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.width, raw.height, raw.pixels)
    }
}

impl SectionBitmap {
    /// Validate and wrap a decoded image
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        pixels: Vec<Rgb>,
    ) -> Result<Self, SectionError> {
        if width == 0 || height == 0 {
            return Err(SectionError::Empty { width, height });
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(SectionError::PixelCount {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            pixels,
        })
    }

    /// Build from text art: `#` is solid, anything else is empty.
    /// Blank lines are ignored; every other line must have the same width.
    pub fn from_ascii(name: impl Into<String>, art: &str) -> Result<Self, SectionError> {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);

        let mut pixels = Vec::with_capacity(width * lines.len());
        for (row, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(SectionError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }
            pixels.extend(line.chars().map(|c| if c == '#' { SOLID } else { EMPTY }));
        }
        Self::new(name, width, lines.len(), pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x).copied()
        } else {
            None
        }
    }
}

/// Occupied columns of every pixel row, in row order.
///
/// Never fails. A degenerate bitmap decodes to nothing, and a row with no
/// solid pixels decodes to an empty list (a pit), not the end of content.
pub fn decode(section: &SectionBitmap) -> Vec<Vec<u16>> {
    if section.width == 0 || section.height == 0 {
        log::warn!("Section '{}' is empty, nothing to decode", section.name);
        return Vec::new();
    }

    section
        .pixels
        .chunks(section.width)
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, rgb)| **rgb == SOLID)
                .map(|(x, _)| x as u16)
                .collect()
        })
        .collect()
}

/// The fixed start section plus the pool streamed in afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionLibrary {
    pub start: SectionBitmap,
    pub pool: Vec<SectionBitmap>,
}

impl SectionLibrary {
    pub fn new(start: SectionBitmap, pool: Vec<SectionBitmap>) -> Self {
        if pool.is_empty() {
            log::warn!("Section pool is empty; terrain will stop after the start section");
        }
        Self { start, pool }
    }

    /// Uniformly random pool section. The start section is never picked.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SectionBitmap> {
        if self.pool.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.pool.len());
        self.pool.get(index)
    }

    /// Hand-made sections for the headless runner and tests
    pub fn builtin() -> Result<Self, SectionError> {
        let start = SectionBitmap::from_ascii("start", START)?;
        let pool = POOL
            .iter()
            .enumerate()
            .map(|(i, art)| SectionBitmap::from_ascii(format!("section_{}", i + 1), art))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(start, pool))
    }
}

const START: &str = "
    ..........
    ..........
    ..........
    ..........
    #######..#
    #######..#
    ..........
    ..........
    ..........
    ....######
    ..........
    ..........
    ######....
    ..........
    ..........
    ..........
    ...####...
    ..........
    ..........
    ##......##
";

const POOL: [&str; 4] = [
    "
    ..........
    .....#####
    ..........
    ..........
    ####......
    ..........
    ..........
    ...####...
    ..........
    #........#
    ",
    "
    ..........
    ###....###
    #........#
    ..........
    ....##....
    ....##....
    ..........
    ##......##
    ..........
    ..........
    ",
    "
    ..........
    ..#####...
    ..#...#...
    ..........
    ######....
    .........#
    ..........
    ....######
    ..........
    ..........
    ",
    "
    ..........
    #.#.#.#.#.
    ..........
    ..........
    .#.#.#.#.#
    ..........
    ..........
    ###..#####
    ..........
    ..........
    ",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_decode_row_major() {
        let section = SectionBitmap::from_ascii("t", "###.......\n..........\n.#.......#").unwrap();
        let rows = decode(&section);
        assert_eq!(rows, vec![vec![0, 1, 2], vec![], vec![1, 9]]);
    }

    #[test]
    fn test_only_sentinel_is_solid() {
        let pixels = vec![SOLID, [0, 0, 1], [10, 10, 10], SOLID];
        let section = SectionBitmap::new("t", 4, 1, pixels).unwrap();
        assert_eq!(decode(&section), vec![vec![0, 3]]);
    }

    #[test]
    fn test_malformed_rejected() {
        assert_eq!(
            SectionBitmap::new("t", 0, 3, vec![]),
            Err(SectionError::Empty { width: 0, height: 3 })
        );
        assert!(matches!(
            SectionBitmap::new("t", 2, 2, vec![SOLID; 3]),
            Err(SectionError::PixelCount { expected: 4, actual: 3, .. })
        ));
        assert!(matches!(
            SectionBitmap::from_ascii("t", "###\n##"),
            Err(SectionError::RaggedRow { row: 1, .. })
        ));
        assert!(SectionBitmap::from_ascii("t", "").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let short = r#"{"name":"bad","width":4,"height":2,"pixels":[[0,0,0],[0,0,0],[255,255,255]]}"#;
        let err = serde_json::from_str::<SectionBitmap>(short).unwrap_err();
        assert!(err.to_string().contains("expected 8"), "{err}");

        let raw: RawSection = serde_json::from_str(short).unwrap();
        assert_eq!(
            SectionBitmap::try_from(raw),
            Err(SectionError::PixelCount {
                width: 4,
                height: 2,
                expected: 8,
                actual: 3,
            })
        );
        let empty = r#"{"width":0,"height":1,"pixels":[]}"#;
        assert!(serde_json::from_str::<SectionBitmap>(empty).is_err());
    }

    #[test]
    fn test_deserialize_round_trips_valid_section() {
        let section = SectionBitmap::from_ascii("ok", "#.\n.#").unwrap();
        let json = serde_json::to_string(&section).unwrap();
        let back: SectionBitmap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
        assert_eq!(back.pixel(1, 1), Some(SOLID));
    }

    #[test]
    fn test_pick_never_returns_start() {
        let library = SectionLibrary::builtin().unwrap();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let picked = library.pick(&mut rng).unwrap();
            assert_ne!(picked.name, "start");
        }
    }

    #[test]
    fn test_pick_from_empty_pool() {
        let start = SectionBitmap::from_ascii("start", "##").unwrap();
        let library = SectionLibrary::new(start, Vec::new());
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(library.pick(&mut rng).is_none());
    }

    #[test]
    fn test_builtin_sections_fit_playfield() {
        let library = SectionLibrary::builtin().unwrap();
        assert_eq!(library.start.width(), 10);
        assert!(library.pool.iter().all(|s| s.width() == 10));
        assert_eq!(library.start.pixel(0, 4), Some(SOLID));
        assert_eq!(library.start.pixel(10, 0), None);
    }
}
