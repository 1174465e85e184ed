/// Cursor into the rendered suggestion list.
///
/// Both directions wrap: moving past the last item selects the first and
/// moving before the first selects the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::NoSelection => None,
            Self::Selected(i) => Some(i),
        }
    }

    pub fn is_selected(self, index: usize) -> bool {
        self == Self::Selected(index)
    }

    /// Down-arrow transition over a list of `len` items.
    pub fn next(self, len: usize) -> Self {
        if len == 0 {
            return self;
        }
        match self {
            Self::NoSelection => Self::Selected(0),
            Self::Selected(i) if i + 1 >= len => Self::Selected(0),
            Self::Selected(i) => Self::Selected(i + 1),
        }
    }

    /// Up-arrow transition over a list of `len` items.
    pub fn previous(self, len: usize) -> Self {
        if len == 0 {
            return self;
        }
        let last = len - 1;
        match self {
            Self::NoSelection => Self::Selected(last),
            Self::Selected(i) if i == 0 || i > last => Self::Selected(last),
            Self::Selected(i) => Self::Selected(i - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_from_nothing_selects_first() {
        assert_eq!(Selection::NoSelection.next(3), Selection::Selected(0));
    }

    #[test]
    fn test_up_from_nothing_selects_last() {
        assert_eq!(Selection::NoSelection.previous(3), Selection::Selected(2));
    }

    #[test]
    fn test_n_downs_return_to_first() {
        for n in 1..6 {
            let mut sel = Selection::NoSelection.next(n);
            for _ in 0..n {
                sel = sel.next(n);
            }
            assert_eq!(sel, Selection::Selected(0), "len {n}");
        }
    }

    #[test]
    fn test_up_wraps_from_first_to_last() {
        assert_eq!(Selection::Selected(0).previous(4), Selection::Selected(3));
        assert_eq!(Selection::Selected(2).previous(4), Selection::Selected(1));
    }

    #[test]
    fn test_empty_list_is_a_no_op() {
        assert_eq!(Selection::NoSelection.next(0), Selection::NoSelection);
        assert_eq!(Selection::NoSelection.previous(0), Selection::NoSelection);
        assert_eq!(Selection::Selected(1).next(0), Selection::Selected(1));
    }

    #[test]
    fn test_stale_index_recovers() {
        // A selection left over from a longer list.
        assert_eq!(Selection::Selected(9).next(3), Selection::Selected(0));
        assert_eq!(Selection::Selected(9).previous(3), Selection::Selected(2));
    }
}
