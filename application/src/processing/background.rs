use rand::{Rng, seq::IndexedRandom};
use tracing::debug;

use crate::error::{AppError, AppResult};
use domain::color::RgbColor;

/// Background policy distilled from configuration.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundPolicy<'a> {
    pub default_color: RgbColor,
    pub palette: &'a [RgbColor],
    pub random_enabled: bool,
}

/// Fails when a request both names a color and asks for a random one.
pub fn check_conflict(explicit: Option<RgbColor>, random_requested: bool) -> AppResult<()> {
    if let (Some(color), true) = (explicit, random_requested) {
        return Err(AppError::ConflictingRequest {
            message: format!(
                "bg_color {color} cannot be combined with a random background request"
            ),
        });
    }
    Ok(())
}

/// Picks the effective background. An explicit color always wins over the
/// global random toggle; the per-request random flag conflicts with it.
pub fn resolve_background<R: Rng + ?Sized>(
    explicit: Option<RgbColor>,
    random_requested: bool,
    policy: BackgroundPolicy<'_>,
    rng: &mut R,
) -> AppResult<RgbColor> {
    check_conflict(explicit, random_requested)?;

    if let Some(color) = explicit {
        return Ok(color);
    }

    if random_requested || policy.random_enabled {
        let color = policy
            .palette
            .choose(rng)
            .copied()
            .ok_or_else(|| AppError::ConfigError {
                message: "background palette cannot be empty".to_string(),
            })?;
        debug!("Picked random background {}", color);
        return Ok(color);
    }

    Ok(policy.default_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const PALETTE: [RgbColor; 3] = [
        RgbColor::new(1, 1, 1),
        RgbColor::new(2, 2, 2),
        RgbColor::new(3, 3, 3),
    ];

    fn policy(random_enabled: bool) -> BackgroundPolicy<'static> {
        BackgroundPolicy {
            default_color: RgbColor::WHITE,
            palette: &PALETTE,
            random_enabled,
        }
    }

    #[test]
    fn explicit_color_plus_random_flag_conflicts() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = resolve_background(
            Some(RgbColor::new(10, 20, 30)),
            true,
            policy(false),
            &mut rng,
        );
        assert!(matches!(result, Err(AppError::ConflictingRequest { .. })));
    }

    #[test]
    fn explicit_color_beats_global_toggle() {
        let mut rng = StdRng::seed_from_u64(7);
        let color = resolve_background(Some(RgbColor::new(9, 9, 9)), false, policy(true), &mut rng)
            .unwrap();
        assert_eq!(color, RgbColor::new(9, 9, 9));
    }

    #[test]
    fn falls_back_to_default_color() {
        let mut rng = StdRng::seed_from_u64(7);
        let color = resolve_background(None, false, policy(false), &mut rng).unwrap();
        assert_eq!(color, RgbColor::WHITE);
    }

    #[test]
    fn random_draws_from_palette() {
        let mut rng = StdRng::seed_from_u64(42);
        for random_requested in [true, false] {
            for _ in 0..50 {
                let color =
                    resolve_background(None, random_requested, policy(true), &mut rng).unwrap();
                assert!(PALETTE.contains(&color));
            }
        }
    }

    #[test]
    fn random_with_empty_palette_is_config_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty = BackgroundPolicy {
            default_color: RgbColor::WHITE,
            palette: &[],
            random_enabled: true,
        };
        let result = resolve_background(None, false, empty, &mut rng);
        assert!(matches!(result, Err(AppError::ConfigError { .. })));
    }
}
