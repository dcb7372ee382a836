//! Knights and knaves puzzles.
//!
//! Knights always tell the truth and knaves always lie. Each character is
//! exactly one of the two, and a statement `S` by character `X` becomes
//! `X is a Knight => S` and `X is a Knave => ¬S`.

use crate::error::AiResult;
use crate::logic::{and, implies, model_check, not, or, symbol, Expr};
use serde::Serialize;

/// A puzzle character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Character {
    A,
    B,
    C,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::A, Character::B, Character::C];

    fn name(self) -> &'static str {
        match self {
            Character::A => "A",
            Character::B => "B",
            Character::C => "C",
        }
    }

    pub fn knight(self) -> Expr {
        symbol(format!("{} is a Knight", self.name()))
    }

    pub fn knave(self) -> Expr {
        symbol(format!("{} is a Knave", self.name()))
    }

    /// Exactly one of knight or knave.
    fn either(self) -> Expr {
        and([
            or([self.knight(), self.knave()]),
            not(and([self.knight(), self.knave()])),
        ])
    }

    /// The character said `statement`.
    fn says(self, statement: Expr) -> Expr {
        and([
            implies(self.knight(), statement.clone()),
            implies(self.knave(), not(statement)),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Puzzle {
    /// A says "I am both a knight and a knave."
    BothKinds,
    /// A says "We are both knaves." B says nothing.
    BothKnaves,
    /// A says "We are the same kind." B says "We are of different kinds."
    SameKind,
    /// A says either "I am a knight." or "I am a knave.", you don't know which.
    /// B says "A said 'I am a knave'." B says "C is a knave."
    /// C says "A is a knight."
    ThreeCharacters,
}

impl Puzzle {
    pub const ALL: [Puzzle; 4] = [
        Puzzle::BothKinds,
        Puzzle::BothKnaves,
        Puzzle::SameKind,
        Puzzle::ThreeCharacters,
    ];

    /// Puzzle by its number, 0 to 3.
    pub fn from_index(index: usize) -> Option<Puzzle> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> String {
        let index = Self::ALL.iter().position(|&p| p == self).unwrap_or_default();
        format!("Puzzle {index}")
    }

    pub fn knowledge(self) -> Expr {
        use Character::{A, B, C};

        match self {
            Puzzle::BothKinds => and([A.either(), A.says(and([A.knight(), A.knave()]))]),
            Puzzle::BothKnaves => and([
                A.either(),
                B.either(),
                A.says(and([A.knave(), B.knave()])),
            ]),
            Puzzle::SameKind => and([
                A.either(),
                B.either(),
                A.says(or([
                    and([A.knight(), B.knight()]),
                    and([A.knave(), B.knave()]),
                ])),
                B.says(or([
                    and([A.knight(), B.knave()]),
                    and([A.knave(), B.knight()]),
                ])),
            ]),
            Puzzle::ThreeCharacters => and([
                A.either(),
                B.either(),
                C.either(),
                // B: "A said 'I am a knave'."
                B.says(A.says(A.knave())),
                B.says(C.knave()),
                C.says(A.knight()),
            ]),
        }
    }
}

/// The symbols a puzzle's knowledge entails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub puzzle: String,
    pub facts: Vec<String>,
}

/// Every knight/knave symbol the puzzle's knowledge entails.
pub fn solve(puzzle: Puzzle) -> AiResult<Solution> {
    let knowledge = puzzle.knowledge();
    let mut facts = Vec::new();
    for character in Character::ALL {
        for query in [character.knight(), character.knave()] {
            if model_check(&knowledge, &query)? {
                facts.push(query.to_string());
            }
        }
    }
    Ok(Solution {
        puzzle: puzzle.title(),
        facts,
    })
}
