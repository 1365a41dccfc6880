//! Dice notation engine.
//!
//! Parses notation such as `2d6+3` or `2d3 + 1d6` into dice groups and rolls them.
//! The grammar is a linear sum of `<count>d<sides>` terms and flat integer modifiers:
//!
//! ```text
//! expr := term (sign term)*
//! term := dice | integer
//! dice := integer "d" integer
//! sign := "+" | "-"
//! ```
//!
//! Whitespace is insignificant. Dice terms are always added; only flat integers
//! may be negative. All flat modifiers are summed and attached to the last dice
//! group of the expression.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use thiserror::Error;

/// Maximum number of dice a single group may roll.
pub const MAX_DICE_PER_GROUP: u32 = 10_000;

static DICE_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)d([0-9]+)$").expect("dice term pattern is valid")
});

/// Errors raised while parsing dice notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// Nothing left after removing whitespace.
    #[error("Empty dice notation")]
    EmptyExpression,

    /// A term is neither `<count>d<sides>` nor a plain integer.
    #[error("Invalid dice notation part: {0}")]
    InvalidTerm(String),

    /// A dice term asked for fewer than one die.
    #[error("Number of dice must be at least 1, got {0}")]
    InvalidDiceCount(u32),

    /// A dice term asked for dice with fewer than one side.
    #[error("Number of sides must be at least 1, got {0}")]
    InvalidDiceSides(u32),

    /// A dice term asked for more dice than a single group may roll.
    #[error("Cannot roll {count} dice in one group (maximum is {max})")]
    TooManyDice {
        /// Requested number of dice
        count: u32,
        /// Per-group limit
        max: u32,
    },

    /// Only flat integers were given.
    #[error("No valid dice notation found in: {0}")]
    NoDiceGroups(String),

    /// The smallest or largest possible total does not fit in an `i64`.
    #[error("Dice notation total out of range: {0}")]
    TotalOutOfRange(String),
}

/// One `<count>d<sides>` term plus the modifier folded onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceGroup {
    /// Number of dice to roll, at least 1.
    pub count: u32,
    /// Sides per die, at least 1.
    pub sides: u32,
    /// Flat adjustment; non-zero only on the last group of an expression.
    pub modifier: i64,
}

impl DiceGroup {
    /// Smallest subtotal this group can produce.
    pub fn min_total(&self) -> i64 {
        i64::from(self.count).saturating_add(self.modifier)
    }

    /// Largest subtotal this group can produce.
    pub fn max_total(&self) -> i64 {
        i64::from(self.count)
            .saturating_mul(i64::from(self.sides))
            .saturating_add(self.modifier)
    }

    fn checked_bounds(&self) -> Option<(i64, i64)> {
        let count = i64::from(self.count);
        let min = count.checked_add(self.modifier)?;
        let max = count
            .checked_mul(i64::from(self.sides))?
            .checked_add(self.modifier)?;
        Some((min, max))
    }
}

/// A parsed notation: dice groups in the order they were written. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpression {
    groups: Vec<DiceGroup>,
}

impl ParsedExpression {
    /// Parse dice notation.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let compact: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(DiceError::EmptyExpression);
        }

        let mut groups = Vec::new();
        let mut accumulated_modifier: i64 = 0;

        for term in split_terms(&compact) {
            match Term::classify(term)? {
                Term::Dice { count, sides } => groups.push(DiceGroup {
                    count,
                    sides,
                    modifier: 0,
                }),
                Term::Modifier(value) => {
                    accumulated_modifier =
                        accumulated_modifier.checked_add(value).ok_or_else(|| {
                            let body = term.strip_prefix(|c: char| c == '+' || c == '-');
                            DiceError::InvalidTerm(body.unwrap_or(term).to_string())
                        })?;
                }
            }
        }

        match groups.last_mut() {
            Some(last) => last.modifier = accumulated_modifier,
            None => return Err(DiceError::NoDiceGroups(compact)),
        }

        // Every total the expression can produce must be representable.
        let in_range = groups.iter().try_fold((0i64, 0i64), |(lo, hi), g| {
            let (min, max) = g.checked_bounds()?;
            Some((lo.checked_add(min)?, hi.checked_add(max)?))
        });
        if in_range.is_none() {
            return Err(DiceError::TotalOutOfRange(compact));
        }

        Ok(Self { groups })
    }

    /// The dice groups, left to right.
    pub fn groups(&self) -> &[DiceGroup] {
        &self.groups
    }

    /// Smallest total the expression can produce.
    pub fn min_total(&self) -> i64 {
        self.groups
            .iter()
            .fold(0i64, |acc, g| acc.saturating_add(g.min_total()))
    }

    /// Largest total the expression can produce.
    pub fn max_total(&self) -> i64 {
        self.groups
            .iter()
            .fold(0i64, |acc, g| acc.saturating_add(g.max_total()))
    }
}

impl FromStr for ParsedExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split before every `+` or `-` that does not start the current term.
fn split_terms(notation: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start = 0;

    for (i, c) in notation.char_indices() {
        if (c == '+' || c == '-') && i > start {
            terms.push(&notation[start..i]);
            start = i;
        }
    }
    if start < notation.len() {
        terms.push(&notation[start..]);
    }

    terms
}

enum Term {
    Dice { count: u32, sides: u32 },
    Modifier(i64),
}

impl Term {
    fn classify(term: &str) -> Result<Self, DiceError> {
        let (negative, body) = match term.as_bytes().first() {
            Some(b'+') => (false, &term[1..]),
            Some(b'-') => (true, &term[1..]),
            _ => (false, term),
        };

        if let Some(caps) = DICE_TERM.captures(body) {
            let invalid = || DiceError::InvalidTerm(body.to_string());
            let count: u32 = caps[1].parse().map_err(|_| invalid())?;
            let sides: u32 = caps[2].parse().map_err(|_| invalid())?;

            if count < 1 {
                return Err(DiceError::InvalidDiceCount(count));
            }
            if sides < 1 {
                return Err(DiceError::InvalidDiceSides(sides));
            }
            if count > MAX_DICE_PER_GROUP {
                return Err(DiceError::TooManyDice {
                    count,
                    max: MAX_DICE_PER_GROUP,
                });
            }
            // The sign of a dice term is dropped.
            return Ok(Term::Dice { count, sides });
        }

        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DiceError::InvalidTerm(body.to_string()));
        }
        let value: i64 = body
            .parse()
            .map_err(|_| DiceError::InvalidTerm(body.to_string()))?;

        Ok(Term::Modifier(if negative { -value } else { value }))
    }
}

/// Source of die results.
///
/// Every [`rand::Rng`] is a `DieRoller`; tests can supply scripted sequences.
pub trait DieRoller {
    /// Draw one die result in `[1, sides]`.
    fn draw(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> DieRoller for R {
    fn draw(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

/// The rolled dice of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRoll {
    /// The group that was rolled.
    pub group: DiceGroup,
    /// Individual die results, in draw order.
    pub draws: Vec<u32>,
}

impl GroupRoll {
    /// Sum of the dice, before the modifier.
    pub fn dice_sum(&self) -> i64 {
        self.draws.iter().map(|&d| i64::from(d)).sum()
    }

    /// Sum of the dice plus the modifier.
    pub fn subtotal(&self) -> i64 {
        self.dice_sum().saturating_add(self.group.modifier)
    }
}

impl fmt::Display for GroupRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let DiceGroup {
            count,
            sides,
            modifier,
        } = self.group;
        write!(f, "{count}d{sides}: {:?} = {}", self.draws, self.dice_sum())?;
        if modifier != 0 {
            write!(f, ", modifier: {modifier:+}, subtotal: {}", self.subtotal())?;
        }
        Ok(())
    }
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    /// Sum of every group subtotal.
    pub total: i64,
    /// Human-readable trace, e.g. `2d6: [4, 5] = 9, 1d6: [6] = 6`.
    pub breakdown: String,
    /// Per-group results the breakdown was rendered from.
    pub groups: Vec<GroupRoll>,
}

/// Roll every group of `expr` using `roller`.
pub fn evaluate_with<D: DieRoller + ?Sized>(
    expr: &ParsedExpression,
    roller: &mut D,
) -> RollOutcome {
    let groups: Vec<GroupRoll> = expr
        .groups()
        .iter()
        .map(|group| GroupRoll {
            group: *group,
            draws: (0..group.count).map(|_| roller.draw(group.sides)).collect(),
        })
        .collect();

    let total = groups
        .iter()
        .fold(0i64, |acc, g| acc.saturating_add(g.subtotal()));
    let breakdown = groups
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    RollOutcome {
        total,
        breakdown,
        groups,
    }
}

/// Roll every group of `expr` with the thread-local RNG.
pub fn evaluate(expr: &ParsedExpression) -> RollOutcome {
    evaluate_with(expr, &mut rand::thread_rng())
}

/// Parse dice notation without rolling.
pub fn parse(notation: &str) -> Result<ParsedExpression, DiceError> {
    ParsedExpression::parse(notation)
}

/// Parse and roll `notation` using `roller`.
pub fn roll_with<D: DieRoller + ?Sized>(
    notation: &str,
    roller: &mut D,
) -> Result<RollOutcome, DiceError> {
    let expr = ParsedExpression::parse(notation)?;
    Ok(evaluate_with(&expr, roller))
}

/// Parse and roll `notation` with the thread-local RNG.
pub fn roll(notation: &str) -> Result<RollOutcome, DiceError> {
    roll_with(notation, &mut rand::thread_rng())
}
