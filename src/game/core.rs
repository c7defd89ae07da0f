//! Game primitives commonly used within [`crate::game`]: squares, players,
//! piece kinds with their movement patterns and the per-variant rule tables.

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 5;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from Sente's side to Gote's side:
///
/// ```
/// use kuroban::game::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::A3 as u8, 5 * 2);
/// assert_eq!(Square::E5 as u8, 24);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use kuroban::game::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1,
    A2, B2, C2, D2, E2,
    A3, B3, C3, D3, E3,
    A4, B4, C4, D4, E4,
    A5, B5, C5, D5, E5,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Shifts the square by the given file and rank deltas, or returns `None`
    /// when the destination falls off the board. All movement patterns are
    /// one-step, so deltas are within -1..=1.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if !(0..BOARD_WIDTH as i8).contains(&file) || !(0..BOARD_WIDTH as i8).contains(&rank) {
            return None;
        }
        Some(Self::new(
            unsafe { mem::transmute(file as u8) },
            unsafe { mem::transmute(rank as u8) },
        ))
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.bytes().len()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the board. In the coordinate
/// notation, it is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='e' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='e', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=4 => Ok(unsafe { mem::transmute(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

/// Represents a horizontal row of the board. The implementation assumes
/// zero-based values (i.e. rank 1 would be 0). Sente pieces move towards
/// [`Rank::Five`], Gote pieces towards [`Rank::One`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
}

impl Rank {
    /// Returns the rank the given player's pieces start on.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::Sente => Self::One,
            Player::Gote => Self::Five,
        }
    }

    /// Returns the rank on which the given player's pawns promote: the
    /// opponent's back rank.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='5' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='5', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=4 => Ok(unsafe { mem::transmute(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A round is played between two sides: Sente (the human side, having the
/// advantage of the first turn) and Gote (the engine-controlled side).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    Sente,
    Gote,
}

impl Player {
    /// "Flips" the side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Sente => Self::Gote,
            Self::Gote => Self::Sente,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "s" => Ok(Self::Sente),
            "g" => Ok(Self::Gote),
            _ => bail!("player should be 's' or 'g', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::Sente => 's',
                Self::Gote => 'g',
            }
        )
    }
}

/// Piece archetypes of the 5×5 battle variant. The kind determines both the
/// movement pattern and the HP/ATK stat line of the active [`Rules`].
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum PieceKind {
    King,
    Gold,
    Silver,
    Pawn,
}

impl PieceKind {
    /// One-step movement offsets as `(file delta, rank delta)` pairs,
    /// "forward" being resolved for the given side. There is no sliding and
    /// no jumping: a destination is the square exactly one offset away.
    #[must_use]
    pub const fn move_pattern(self, player: Player) -> &'static [(i8, i8)] {
        match (self, player) {
            // The king steps to any of the 8 neighbours regardless of side.
            (Self::King, _) => &[
                (-1, 0),
                (1, 0),
                (0, -1),
                (0, 1),
                (-1, -1),
                (-1, 1),
                (1, -1),
                (1, 1),
            ],
            (Self::Pawn, Player::Sente) => &[(0, 1)],
            (Self::Pawn, Player::Gote) => &[(0, -1)],
            // Silver: forward, both forward diagonals, both back diagonals.
            (Self::Silver, Player::Sente) => &[(0, 1), (-1, 1), (1, 1), (-1, -1), (1, -1)],
            (Self::Silver, Player::Gote) => &[(0, -1), (-1, -1), (1, -1), (-1, 1), (1, 1)],
            // Gold: forward, backward, sideways and both forward diagonals.
            (Self::Gold, Player::Sente) => &[(0, 1), (0, -1), (-1, 0), (1, 0), (-1, 1), (1, 1)],
            (Self::Gold, Player::Gote) => {
                &[(0, -1), (0, 1), (-1, 0), (1, 0), (-1, -1), (1, -1)]
            },
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Gold => 'g',
            Self::Silver => 's',
            Self::Pawn => 'p',
        })
    }
}

/// HP/ATK stat line of a piece kind within a rules variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceStats {
    /// Starting (and maximum) hit points.
    pub hp: i32,
    /// Damage dealt per attack or retaliation.
    pub attack: i32,
}

/// Back-rank layout shared by both variants, files a through e.
pub const BACK_RANK_LAYOUT: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Pawn,
    PieceKind::Silver,
    PieceKind::King,
    PieceKind::Gold,
    PieceKind::Pawn,
];

/// Stat tables and round limits of one game variant.
#[derive(Clone, Debug)]
pub struct Rules {
    king: PieceStats,
    gold: PieceStats,
    silver: PieceStats,
    pawn: PieceStats,
    /// Number of full rounds after which an undecided game is drawn. `None`
    /// means the variant plays until a king falls.
    pub turn_cap: Option<u16>,
}

impl Rules {
    /// The round-capped variant: low stat lines and a draw after 10 full
    /// rounds with both kings standing.
    #[must_use]
    pub const fn skirmish() -> Self {
        Self {
            king: PieceStats { hp: 6, attack: 4 },
            gold: PieceStats { hp: 4, attack: 3 },
            silver: PieceStats { hp: 3, attack: 4 },
            pawn: PieceStats { hp: 2, attack: 2 },
            turn_cap: Some(10),
        }
    }

    /// The uncapped variant: beefier stat lines, played until a king falls.
    #[must_use]
    pub const fn duel() -> Self {
        Self {
            king: PieceStats { hp: 10, attack: 4 },
            gold: PieceStats { hp: 12, attack: 5 },
            silver: PieceStats { hp: 9, attack: 6 },
            pawn: PieceStats { hp: 6, attack: 3 },
            turn_cap: None,
        }
    }

    /// Stat line for the given kind under this variant.
    #[must_use]
    pub const fn stats(&self, kind: PieceKind) -> PieceStats {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Gold => self.gold,
            PieceKind::Silver => self.silver,
            PieceKind::Pawn => self.pawn,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::skirmish()
    }
}

/// A single unit on the board: identity, stats and position. HP is only ever
/// mutated by the combat resolver; a piece whose HP drops to 0 is dead and
/// leaves the occupancy grid for good.
#[derive(Clone, Debug)]
pub struct Piece {
    kind: PieceKind,
    owner: Player,
    hp: i32,
    max_hp: i32,
    attack: i32,
    square: Square,
    promoted: bool,
}

impl Piece {
    /// Creates a fresh piece with the given stat line on the given cell.
    /// Used by the board setup and by tests staging arbitrary positions.
    #[must_use]
    pub const fn new(kind: PieceKind, owner: Player, square: Square, stats: PieceStats) -> Self {
        Self {
            kind,
            owner,
            hp: stats.hp,
            max_hp: stats.hp,
            attack: stats.attack,
            square,
            promoted: false,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    /// Current hit points; 0 for dead pieces.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Damage dealt when this piece attacks or retaliates.
    #[must_use]
    pub const fn attack(&self) -> i32 {
        self.attack
    }

    /// The cell this piece occupies (stale once the piece is dead).
    #[must_use]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Whether the piece started as a pawn and reached the promotion rank.
    #[must_use]
    pub const fn is_promoted(&self) -> bool {
        self.promoted
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Deals `amount` damage and reports whether the piece died from it.
    /// Damage only ever subtracts HP; the floor is clamped at 0.
    pub(crate) fn take_damage(&mut self, amount: i32) -> bool {
        debug_assert!(self.is_alive(), "dead pieces must not fight");
        self.hp = (self.hp - amount).max(0);
        !self.is_alive()
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    /// Irreversibly upgrades a pawn to the given gold stat line. The promoted
    /// flag keeps the unit distinguishable from a born gold.
    pub(crate) fn promote(&mut self, gold: PieceStats) {
        debug_assert_eq!(self.kind, PieceKind::Pawn, "only pawns promote");
        self.kind = PieceKind::Gold;
        self.hp = gold.hp;
        self.max_hp = gold.hp;
        self.attack = gold.attack;
        self.promoted = true;
    }
}

impl fmt::Display for Piece {
    /// Sente pieces are uppercase, Gote pieces lowercase.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(match (&self.owner, &self.kind) {
            (Player::Sente, PieceKind::King) => 'K',
            (Player::Sente, PieceKind::Gold) => 'G',
            (Player::Sente, PieceKind::Silver) => 'S',
            (Player::Sente, PieceKind::Pawn) => 'P',
            (Player::Gote, PieceKind::King) => 'k',
            (Player::Gote, PieceKind::Gold) => 'g',
            (Player::Gote, PieceKind::Silver) => 's',
            (Player::Gote, PieceKind::Pawn) => 'p',
        })
    }
}
