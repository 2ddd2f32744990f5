/// One of the four on-screen control icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// `w`: move forward.
    Up,
    /// `a`: turn left.
    Left,
    /// `s`: move back.
    Down,
    /// `d`: turn right.
    Right,
}

impl ControlKey {
    pub const ALL: [ControlKey; 4] = [
        ControlKey::Up,
        ControlKey::Left,
        ControlKey::Down,
        ControlKey::Right,
    ];

    /// Matches an action label against the icon keys, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "w" => Some(ControlKey::Up),
            "a" => Some(ControlKey::Left),
            "s" => Some(ControlKey::Down),
            "d" => Some(ControlKey::Right),
            _ => None,
        }
    }

    /// The letter printed on the icon.
    pub fn letter(self) -> char {
        match self {
            ControlKey::Up => 'W',
            ControlKey::Left => 'A',
            ControlKey::Down => 'S',
            ControlKey::Right => 'D',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("w", Some(ControlKey::Up))]
    #[case("W", Some(ControlKey::Up))]
    #[case("a", Some(ControlKey::Left))]
    #[case("S", Some(ControlKey::Down))]
    #[case("d", Some(ControlKey::Right))]
    #[case("jump", None)]
    #[case("", None)]
    fn test_from_label(#[case] label: &str, #[case] expected: Option<ControlKey>) {
        assert_eq!(ControlKey::from_label(label), expected);
    }

    #[test]
    fn test_letters_round_trip_through_labels() {
        for key in ControlKey::ALL {
            assert_eq!(ControlKey::from_label(&key.letter().to_string()), Some(key));
        }
    }
}
