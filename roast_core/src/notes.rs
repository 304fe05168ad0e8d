//! Roast notes and the green/roasted bean metrics derived from them.

/// Free-form notes and bean measurements saved with a profile.
///
/// Weights are in grams, volumes in millilitres, densities in g/L, colours
/// on the Agtron scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoastNotes {
    pub title: String,
    pub country: String,
    pub process: String,
    pub notes: String,
    pub weight_green: f64,
    pub weight_roasted: f64,
    pub volume_green: f64,
    pub volume_roasted: f64,
    pub density_green: f64,
    pub density_roasted: f64,
    pub moisture_green: f64,
    pub moisture_roasted: f64,
    pub color_whole: f64,
    pub color_ground: f64,
    pub flavors: Vec<String>,
}

fn change_percent(before: f64, after: f64) -> f64 {
    if before == 0.0 || after == 0.0 {
        return 0.0;
    }
    let p = (after - before) * 100.0 / before;
    if p.is_finite() { p } else { 0.0 }
}

/// Bulk density in g/L from grams and millilitres. 0 when either is zero.
pub fn density(weight: f64, volume: f64) -> f64 {
    if weight == 0.0 || volume == 0.0 {
        return 0.0;
    }
    let d = 1000.0 * weight / volume;
    if d.is_finite() { d } else { 0.0 }
}

/// Inverse of [`density`]: millilitres from grams and g/L.
pub fn volume_from_density(weight: f64, density: f64) -> f64 {
    if weight == 0.0 || density == 0.0 {
        return 0.0;
    }
    let v = 1000.0 * weight / density;
    if v.is_finite() { v } else { 0.0 }
}

/// Verbal roast level for an Agtron reading.
pub fn agtron_level(value: f64) -> &'static str {
    const BANDS: [(f64, &str); 9] = [
        (20.0, "Over Developed"),
        (30.0, "Extremely Dark"),
        (40.0, "Dark"),
        (50.0, "Medium Dark"),
        (60.0, "Medium"),
        (70.0, "Medium Light"),
        (80.0, "Light"),
        (90.0, "Very Light"),
        (100.0, "Extremely Light"),
    ];
    BANDS
        .iter()
        .find(|(upper, _)| value < *upper)
        .map_or("Under Developed", |(_, name)| name)
}

impl RoastNotes {
    /// Weight change from green to roasted (negative: loss).
    pub fn weight_loss_percent(&self) -> f64 {
        change_percent(self.weight_green, self.weight_roasted)
    }

    pub fn volume_change_percent(&self) -> f64 {
        change_percent(self.volume_green, self.volume_roasted)
    }

    pub fn density_change_percent(&self) -> f64 {
        change_percent(self.density_green, self.density_roasted)
    }

    /// Recompute both densities from weight and volume where possible.
    pub fn refresh_densities(&mut self) {
        let g = density(self.weight_green, self.volume_green);
        if g != 0.0 {
            self.density_green = g;
        }
        let r = density(self.weight_roasted, self.volume_roasted);
        if r != 0.0 {
            self.density_roasted = r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_loss() {
        let n = RoastNotes {
            weight_green: 200.0,
            weight_roasted: 170.0,
            ..RoastNotes::default()
        };
        assert!((n.weight_loss_percent() + 15.0).abs() < 1e-9);
        assert_eq!(RoastNotes::default().weight_loss_percent(), 0.0);
    }

    #[test]
    fn densities() {
        let mut n = RoastNotes {
            weight_green: 200.0,
            volume_green: 280.0,
            weight_roasted: 170.0,
            volume_roasted: 340.0,
            ..RoastNotes::default()
        };
        n.refresh_densities();
        assert!((n.density_green - 714.285_714).abs() < 1e-3);
        assert_eq!(n.density_roasted, 500.0);
        assert!(n.density_change_percent() < 0.0);
        assert_eq!(density(10.0, 0.0), 0.0);
        assert!((volume_from_density(170.0, 500.0) - 340.0).abs() < 1e-9);
    }

    #[test]
    fn agtron_bands() {
        assert_eq!(agtron_level(15.0), "Over Developed");
        assert_eq!(agtron_level(55.0), "Medium");
        assert_eq!(agtron_level(99.9), "Extremely Light");
        assert_eq!(agtron_level(120.0), "Under Developed");
    }
}
