//! Cursor-bearing sequences of values.
//!
//! A `Series` shares its elements through an `Rc`; cloning one (for example
//! when the evaluator enters a block) copies only the cursor. Mutation goes
//! through [`Series::items_mut`], which copies the elements first if they
//! are shared.

use std::rc::Rc;

use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Series {
    items: Rc<Vec<Value>>,
    pos: usize,
}

impl Series {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: Rc::new(items),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.items.len());
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// The same elements with the cursor at the start.
    pub fn rewound(&self) -> Series {
        Series {
            items: Rc::clone(&self.items),
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.items.len()
    }

    /// Return the element under the cursor and advance past it.
    pub fn pop(&mut self) -> Option<Value> {
        let value = self.items.get(self.pos).cloned();
        if value.is_some() {
            self.pos += 1;
        }
        value
    }

    pub fn peek(&self) -> Option<&Value> {
        self.items.get(self.pos)
    }

    /// Advance the cursor by one element.
    pub fn next(&mut self) {
        if self.pos < self.items.len() {
            self.pos += 1;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Elements from the cursor to the end.
    pub fn remaining(&self) -> &[Value] {
        &self.items[self.pos.min(self.items.len())..]
    }

    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        Rc::make_mut(&mut self.items)
    }

    pub fn shares_items(&self, other: &Series) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_advances_until_end() {
        let mut s = Series::new(vec![1.into(), 2.into()]);
        assert_eq!(s.pop(), Some(Value::Integer(1)));
        assert_eq!(s.peek(), Some(&Value::Integer(2)));
        assert_eq!(s.pop(), Some(Value::Integer(2)));
        assert!(s.at_end());
        assert_eq!(s.pop(), None);
        assert_eq!(s.pos(), 2);
    }

    #[test]
    fn test_clone_copies_cursor_not_items() {
        let mut a = Series::new(vec![1.into(), 2.into()]);
        a.next();
        let b = a.clone();
        assert!(a.shares_items(&b));
        assert_eq!(b.pos(), 1);
        assert_eq!(b.rewound().pos(), 0);
    }

    #[test]
    fn test_items_mut_copies_shared_elements() {
        let a = Series::new(vec![3.into(), 1.into()]);
        let mut b = a.clone();
        b.items_mut().reverse();
        assert_eq!(a.items(), &[Value::Integer(3), Value::Integer(1)]);
        assert_eq!(b.items(), &[Value::Integer(1), Value::Integer(3)]);
    }
}
