//! Outfit sprites
//!
//! Purely cosmetic: the selected outfit changes what gets drawn, never the
//! player's footprint or speed.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostumeSprite {
    /// Image path relative to the asset root
    pub asset: &'static str,
    /// Draw scale relative to the footprint
    pub scale: f32,
    /// Flip horizontally
    pub mirrored: bool,
}

const DEFAULT: CostumeSprite = CostumeSprite {
    asset: "images/player/default.png",
    scale: 1.0,
    mirrored: false,
};

/// Sprite for an outfit key; unknown keys get the default look
pub fn sprite_for(key: &str) -> CostumeSprite {
    match key {
        "wizard" => CostumeSprite {
            asset: "images/player/wizard.png",
            scale: 1.25,
            mirrored: false,
        },
        "cat" => CostumeSprite {
            asset: "images/player/cat.png",
            scale: 1.1,
            mirrored: true,
        },
        "alien" => CostumeSprite {
            asset: "images/player/alien.png",
            scale: 1.15,
            mirrored: false,
        },
        _ => DEFAULT,
    }
}

/// Shop price in coins; `None` for outfits that can't be bought
pub fn price(key: &str) -> Option<u64> {
    match key {
        "wizard" => Some(70),
        "cat" => Some(100),
        "alien" => Some(50),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_outfits() {
        assert_eq!(sprite_for("wizard").asset, "images/player/wizard.png");
        assert!(sprite_for("cat").mirrored);
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(sprite_for("default"), DEFAULT);
        assert_eq!(sprite_for("pirate"), DEFAULT);
    }

    #[test]
    fn test_prices() {
        assert_eq!(price("alien"), Some(50));
        assert_eq!(price("default"), None);
        assert_eq!(price("pirate"), None);
    }
}
