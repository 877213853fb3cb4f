//! Calendrier d'un balayage du plafond d'itérations.

use crate::error::FractalError;

/// Plafond initial par défaut.
pub const DEFAULT_START: u32 = 1;
/// Plafond (exclu) par défaut.
pub const DEFAULT_CEILING: u32 = 1500;

/// Nombre de copies d'une frame dans la vidéo : max(1, 5 - cap).
///
/// Seuls les tout premiers plafonds (1 à 3) sont dupliqués ; à partir de 4
/// chaque frame apparaît une seule fois.
pub fn repeat_count(cap: u32) -> u32 {
    5u32.saturating_sub(cap).max(1)
}

/// Plafond suivant : cap + max(1, cap / 10) + 1 (division entière).
pub fn next_cap(cap: u32) -> u32 {
    cap.saturating_add((cap / 10).max(1)).saturating_add(1)
}

/// Suite strictement croissante de plafonds `start, next_cap(start), ...`
/// tant qu'ils restent sous `ceiling`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepSchedule {
    start: u32,
    ceiling: u32,
}

impl SweepSchedule {
    pub fn new(start: u32, ceiling: u32) -> Result<Self, FractalError> {
        if start == 0 {
            return Err(FractalError::Configuration(
                "le plafond d'itérations initial doit être >= 1".into(),
            ));
        }
        Ok(Self { start, ceiling })
    }

    pub fn caps(&self) -> impl Iterator<Item = u32> {
        let ceiling = self.ceiling;
        std::iter::successors(Some(self.start), |&cap| {
            let next = next_cap(cap);
            (next > cap).then_some(next)
        })
        .take_while(move |&cap| cap < ceiling)
    }

    /// Plan complet : plafond, premier index de frame et nombre de copies.
    ///
    /// Ne dépend que du calendrier : un export repris produit exactement le
    /// même plan qu'un export depuis zéro.
    pub fn steps(&self) -> impl Iterator<Item = SweepStep> {
        self.caps().scan(0u32, |index, cap| {
            let step = SweepStep { cap, first_index: *index, repeat: repeat_count(cap) };
            *index += step.repeat;
            Some(step)
        })
    }

    /// Nombre total de frames du balayage.
    pub fn frame_count(&self) -> u32 {
        self.steps().map(|s| s.repeat).sum()
    }
}

/// Un pas du balayage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepStep {
    pub cap: u32,
    pub first_index: u32,
    pub repeat: u32,
}

impl SweepStep {
    pub fn indices(&self) -> std::ops::Range<u32> {
        self.first_index..self.first_index + self.repeat
    }
}
