//! Self-balancing binary search tree (AVL)
//!
//! An ordered multiset over any comparator. Elements that compare equal are
//! kept as separate nodes, and in-order traversal yields them in the order
//! they were inserted unless a removal reshuffles the subtree.
//!
//! # Invariants
//!
//! - For every node, the heights of its two subtrees differ by at most one.
//! - In-order traversal is sorted by the comparator.
//! - Each node owns its children; the tree owns the root.
//!
//! Iterators borrow the tree, so it cannot be mutated while one is alive.

use std::cmp::Ordering;
use std::fmt;

/// Total order over `T` used to place elements in an [`AvlTree`].
///
/// Implemented for any `Fn(&T, &T) -> Ordering` closure and for
/// [`NaturalOrder`]. A comparator that is not a total order leaves the tree
/// in an unspecified (but memory-safe) state.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders elements by their `Ord` implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    value: T,
    /// Height of the subtree rooted here; a leaf has height 1
    height: i32,
    left: Link<T>,
    right: Link<T>,
}

fn height<T>(link: &Link<T>) -> i32 {
    link.as_ref().map_or(0, |n| n.height)
}

impl<T> Node<T> {
    fn leaf(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left height minus right height
    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restore the height and balance of `node`, whose children are balanced
/// and differ in height by at most two.
fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.update_height();
    let balance = node.balance_factor();
    if balance > 1 {
        // left-right case
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance_factor() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        return rotate_right(node);
    }
    if balance < -1 {
        // right-left case
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance_factor() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        return rotate_left(node);
    }
    node
}

fn insert<T, C: Comparator<T>>(link: Link<T>, value: T, cmp: &C) -> Box<Node<T>> {
    let Some(mut node) = link else {
        return Node::leaf(value);
    };
    // Equal values go right so they follow earlier equals in order
    if cmp.compare(&value, &node.value) == Ordering::Less {
        node.left = Some(insert(node.left.take(), value, cmp));
    } else {
        node.right = Some(insert(node.right.take(), value, cmp));
    }
    rebalance(node)
}

/// Detach the smallest element of a subtree
fn take_min<T>(mut node: Box<Node<T>>) -> (T, Link<T>) {
    match node.left.take() {
        None => {
            let Node { value, right, .. } = *node;
            (value, right)
        }
        Some(left) => {
            let (min, rest) = take_min(left);
            node.left = rest;
            (min, Some(rebalance(node)))
        }
    }
}

fn remove<T, C: Comparator<T>>(link: &mut Link<T>, value: &T, cmp: &C) -> Option<T> {
    let ordering = cmp.compare(value, &link.as_ref()?.value);
    let removed = match ordering {
        Ordering::Less => remove(&mut link.as_mut()?.left, value, cmp),
        Ordering::Greater => remove(&mut link.as_mut()?.right, value, cmp),
        Ordering::Equal => {
            let mut node = link.take()?;
            let replacement = match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (successor, rest) = take_min(right);
                    let old = std::mem::replace(&mut node.value, successor);
                    node.left = Some(left);
                    node.right = rest;
                    *link = Some(rebalance(node));
                    return Some(old);
                }
            };
            *link = replacement;
            return Some(node.value);
        }
    };
    if removed.is_some() {
        if let Some(node) = link.take() {
            *link = Some(rebalance(node));
        }
    }
    removed
}

/// A balanced ordered multiset.
///
/// # Example
///
/// ```
/// use draw3d_optimizer::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for v in [5, 1, 4, 1, 3] {
///     tree.insert(v);
/// }
/// assert_eq!(tree.to_vec(), vec![1, 1, 3, 4, 5]);
/// assert!(tree.remove(&1));
/// assert_eq!(tree.to_vec(), vec![1, 3, 4, 5]);
/// ```
pub struct AvlTree<T, C = NaturalOrder> {
    root: Link<T>,
    len: usize,
    cmp: C,
}

impl<T: Ord> AvlTree<T> {
    /// Tree ordered by `T`'s `Ord` implementation
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> AvlTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        AvlTree {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Insert `value`, keeping any elements that compare equal to it.
    ///
    /// Always changes the tree, so this returns `true`; the return value
    /// mirrors [`remove`](Self::remove) for callers that track changes.
    pub fn insert(&mut self, value: T) -> bool {
        let root = self.root.take();
        self.root = Some(insert(root, value, &self.cmp));
        self.len += 1;
        true
    }

    /// Remove one element comparing equal to `value`.
    ///
    /// With several equal elements the first one met on the search path goes.
    /// Returns `false` if nothing compared equal.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Like [`remove`](Self::remove) but hands back the removed element
    pub fn take(&mut self, value: &T) -> Option<T> {
        let removed = remove(&mut self.root, value, &self.cmp);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Any stored element comparing equal to `probe`
    pub fn find(&self, probe: &T) -> Option<&T> {
        let mut link = &self.root;
        while let Some(node) = link {
            match self.cmp.compare(probe, &node.value) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn contains(&self, probe: &T) -> bool {
        self.find(probe).is_some()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }
}

impl<T, C> AvlTree<T, C> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root; zero for an empty tree
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Smallest element
    pub fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Largest element
    pub fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// In-order iterator. Restartable: every call begins at the smallest element.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height()),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Elements in ascending order, cloned
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// In-order walk over a contiguous range.
    ///
    /// `locate` tells where an element sits relative to the range: `Less`
    /// below it, `Equal` inside, `Greater` above. It must be monotone with
    /// the tree's order. Subtrees entirely below the range are skipped, and
    /// the walk stops at the first element above it.
    pub fn range_by<F>(&self, locate: F) -> Range<'_, T, F>
    where
        F: Fn(&T) -> Ordering,
    {
        let mut range = Range {
            stack: Vec::with_capacity(self.height()),
            locate,
        };
        range.descend(self.root.as_deref());
        range
    }

    /// Check the height bookkeeping and the balance of every node
    pub fn is_balanced(&self) -> bool {
        fn check<T>(link: &Link<T>) -> Option<i32> {
            let Some(node) = link else {
                return Some(0);
            };
            let left = check(&node.left)?;
            let right = check(&node.right)?;
            let h = 1 + left.max(right);
            ((left - right).abs() <= 1 && node.height == h).then_some(h)
        }
        check(&self.root).is_some()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone, C: Clone> Clone for AvlTree<T, C> {
    fn clone(&self) -> Self {
        fn clone_link<T: Clone>(link: &Link<T>) -> Link<T> {
            link.as_ref().map(|n| {
                Box::new(Node {
                    value: n.value.clone(),
                    height: n.height,
                    left: clone_link(&n.left),
                    right: clone_link(&n.right),
                })
            })
        }
        AvlTree {
            root: clone_link(&self.root),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<T, C: Comparator<T>> Extend<T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// In-order iterator over an [`AvlTree`]
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Pruned in-order walk returned by [`AvlTree::range_by`]
pub struct Range<'a, T, F> {
    stack: Vec<&'a Node<T>>,
    locate: F,
}

impl<'a, T, F> Range<'a, T, F>
where
    F: Fn(&T) -> Ordering,
{
    /// Push the path to the smallest element of `node` not below the range
    fn descend(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            if (self.locate)(&n.value) == Ordering::Less {
                node = n.right.as_deref();
            } else {
                self.stack.push(n);
                node = n.left.as_deref();
            }
        }
    }
}

impl<'a, T, F> Iterator for Range<'a, T, F>
where
    F: Fn(&T) -> Ordering,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        if (self.locate)(&node.value) == Ordering::Greater {
            self.stack.clear();
            return None;
        }
        self.descend(node.right.as_deref());
        Some(&node.value)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree() {
        let tree: AvlTree<i32> = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.iter().next(), None);
        assert!(tree.is_balanced());
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = AvlTree::new();
        for v in 0..1024 {
            assert!(tree.insert(v));
            assert!(tree.is_balanced(), "unbalanced after inserting {}", v);
        }
        // 1024 nodes fit in height 11 for a perfectly balanced tree; AVL stays under 1.45 log2(n)
        assert!(tree.height() <= 14, "height {}", tree.height());
        assert_eq!(tree.to_vec(), (0..1024).collect::<Vec<_>>());
    }

    #[test]
    fn each_rotation_case() {
        // right-right, left-left, left-right, right-left
        for order in [[1, 2, 3], [3, 2, 1], [3, 1, 2], [1, 3, 2]] {
            let tree: AvlTree<i32> = order.into_iter().collect();
            assert_eq!(tree.height(), 2, "order {:?}", order);
            assert_eq!(tree.to_vec(), vec![1, 2, 3]);
        }
    }

    #[test]
    fn duplicates_are_separate_entries() {
        let tree: AvlTree<i32> = [2, 1, 2, 2, 3].into_iter().collect();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.to_vec(), vec![1, 2, 2, 2, 3]);
    }

    #[test]
    fn equal_elements_keep_insertion_order() {
        let mut tree = AvlTree::with_comparator(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        for item in [(1, 'a'), (0, 'x'), (1, 'b'), (1, 'c'), (2, 'y')] {
            tree.insert(item);
        }
        let letters: String = tree.iter().map(|(_, c)| *c).collect();
        assert_eq!(letters, "xabcy");
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut tree: AvlTree<i32> = (0..10).collect();
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.to_vec(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn remove_node_with_two_children() {
        let mut tree: AvlTree<i32> = [4, 2, 6, 1, 3, 5, 7].into_iter().collect();
        assert!(tree.remove(&4));
        assert_eq!(tree.to_vec(), vec![1, 2, 3, 5, 6, 7]);
        assert!(tree.is_balanced());
    }

    #[test]
    fn remove_one_duplicate_at_a_time() {
        let mut tree: AvlTree<i32> = [7, 7, 7].into_iter().collect();
        assert!(tree.remove(&7));
        assert_eq!(tree.to_vec(), vec![7, 7]);
        assert!(tree.remove(&7));
        assert!(tree.remove(&7));
        assert!(!tree.remove(&7));
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_everything_rebalances() {
        let mut tree: AvlTree<i32> = (0..200).collect();
        for v in (0..200).step_by(2).chain((1..200).step_by(2)) {
            assert!(tree.remove(&v));
            assert!(tree.is_balanced(), "unbalanced after removing {}", v);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn take_returns_stored_element() {
        let mut tree = AvlTree::with_comparator(|a: &(u8, &str), b: &(u8, &str)| a.0.cmp(&b.0));
        tree.insert((1, "one"));
        tree.insert((2, "two"));
        assert_eq!(tree.take(&(2, "")), Some((2, "two")));
        assert_eq!(tree.find(&(1, "")), Some(&(1, "one")));
        assert!(!tree.contains(&(2, "")));
    }

    #[test]
    fn first_and_last() {
        let tree: AvlTree<i32> = [5, -3, 12, 0].into_iter().collect();
        assert_eq!(tree.first(), Some(&-3));
        assert_eq!(tree.last(), Some(&12));
    }

    #[test]
    fn iteration_is_restartable() {
        let tree: AvlTree<i32> = [3, 1, 2].into_iter().collect();
        let a: Vec<_> = tree.iter().collect();
        let b: Vec<_> = (&tree).into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(tree.iter().len(), 3);
    }

    #[test]
    fn reverse_comparator() {
        let mut tree = AvlTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        tree.extend([1, 5, 3]);
        assert_eq!(tree.to_vec(), vec![5, 3, 1]);
    }

    #[test]
    fn range_by_yields_contiguous_slice() {
        let tree: AvlTree<i32> = (0..100).rev().collect();
        let inside: Vec<i32> = tree
            .range_by(|v| {
                if *v < 40 {
                    Ordering::Less
                } else if *v > 45 {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .copied()
            .collect();
        assert_eq!(inside, vec![40, 41, 42, 43, 44, 45]);
    }

    #[test]
    fn range_by_open_ended() {
        let tree: AvlTree<i32> = (0..10).collect();
        let upto: Vec<i32> = tree
            .range_by(|v| if *v <= 3 { Ordering::Equal } else { Ordering::Greater })
            .copied()
            .collect();
        assert_eq!(upto, vec![0, 1, 2, 3]);
        let none: Vec<i32> = tree.range_by(|_| Ordering::Less).copied().collect();
        assert!(none.is_empty());
    }

    #[test]
    fn clone_is_deep() {
        let mut a: AvlTree<i32> = (0..5).collect();
        let b = a.clone();
        a.remove(&0);
        assert_eq!(b.to_vec(), vec![0, 1, 2, 3, 4]);
        assert_eq!(format!("{:?}", b), "{0, 1, 2, 3, 4}");
    }
}
