// Rules for the small fun commands. Kept here so the Discord commands only
// translate arguments and format embeds.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Please provide a number greater than 0.")]
    NoSides,
    #[error("Please choose rock, paper, or scissors.")]
    UnknownChoice,
}

/// Roll a die with `sides` faces.
pub fn roll_die(sides: u32) -> Result<u32, GameError> {
    if sides < 1 {
        return Err(GameError::NoSides);
    }
    Ok(rand::thread_rng().gen_range(1..=sides))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    pub const ALL: [RpsChoice; 3] = [RpsChoice::Rock, RpsChoice::Paper, RpsChoice::Scissors];

    pub fn random() -> Self {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&RpsChoice::Rock)
    }

    fn beats(self, other: RpsChoice) -> bool {
        matches!(
            (self, other),
            (RpsChoice::Rock, RpsChoice::Scissors)
                | (RpsChoice::Paper, RpsChoice::Rock)
                | (RpsChoice::Scissors, RpsChoice::Paper)
        )
    }
}

impl FromStr for RpsChoice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Ok(RpsChoice::Rock),
            "paper" => Ok(RpsChoice::Paper),
            "scissors" => Ok(RpsChoice::Scissors),
            _ => Err(GameError::UnknownChoice),
        }
    }
}

impl fmt::Display for RpsChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RpsChoice::Rock => "Rock",
            RpsChoice::Paper => "Paper",
            RpsChoice::Scissors => "Scissors",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsOutcome {
    Tie,
    PlayerWins,
    BotWins,
}

impl RpsOutcome {
    pub fn headline(&self) -> &'static str {
        match self {
            RpsOutcome::Tie => "It's a tie!",
            RpsOutcome::PlayerWins => "You win!",
            RpsOutcome::BotWins => "I win!",
        }
    }
}

pub fn play_rps(player: RpsChoice, bot: RpsChoice) -> RpsOutcome {
    if player == bot {
        RpsOutcome::Tie
    } else if player.beats(bot) {
        RpsOutcome::PlayerWins
    } else {
        RpsOutcome::BotWins
    }
}
