//! Intrusive doubly linked lists of arena objects.
//!
//! [BasicBlock](crate::basic_block::BasicBlock)s hold lists of
//! [Operation](crate::operation::Operation)s and [Region](crate::region::Region)s
//! hold lists of blocks. Nodes and containers only store the links;
//! every list update goes through the methods on `Ptr<T: LinkedList>`.

use crate::context::{Context, Ptr};

use private::{ContainsLinkedList as _, LinkedList as _};

pub(crate) mod private {
    use crate::context::{private::ArenaObj, Ptr};

    /// First and last nodes of a list.
    pub struct ListEnds<T: ArenaObj> {
        pub(super) head: Option<Ptr<T>>,
        pub(super) tail: Option<Ptr<T>>,
    }

    impl<T: ArenaObj> Default for ListEnds<T> {
        fn default() -> Self {
            ListEnds {
                head: None,
                tail: None,
            }
        }
    }

    /// Where a node sits: its neighbours and the container of its list.
    pub struct ListLinks<T: ArenaObj, C: ArenaObj> {
        pub(super) prev: Option<Ptr<T>>,
        pub(super) next: Option<Ptr<T>>,
        pub(super) container: Option<Ptr<C>>,
    }

    impl<T: ArenaObj, C: ArenaObj> Default for ListLinks<T, C> {
        fn default() -> Self {
            ListLinks {
                prev: None,
                next: None,
                container: None,
            }
        }
    }

    pub trait ContainsLinkedList<T: ArenaObj> {
        fn list_ends(&self) -> &ListEnds<T>;
        fn list_ends_mut(&mut self) -> &mut ListEnds<T>;
    }

    pub trait LinkedList: ArenaObj {
        type ContainerType: ContainsLinkedList<Self> + ArenaObj;
        fn list_links(&self) -> &ListLinks<Self, Self::ContainerType>;
        fn list_links_mut(&mut self) -> &mut ListLinks<Self, Self::ContainerType>;
    }
}

/// An object holding a list of `T`s.
pub trait ContainsLinkedList<T: LinkedList>: private::ContainsLinkedList<T> {
    fn get_head(&self) -> Option<Ptr<T>> {
        self.list_ends().head
    }

    fn get_tail(&self) -> Option<Ptr<T>> {
        self.list_ends().tail
    }

    /// Iterate over the list, front to back (or back to front with `rev`).
    /// The list must not be modified while iterating.
    fn iter<'a>(&self, ctx: &'a Context) -> Iter<'a, T> {
        Iter {
            front: self.get_head(),
            back: self.get_tail(),
            ctx,
        }
    }
}

impl<T: LinkedList, C: private::ContainsLinkedList<T>> ContainsLinkedList<T> for C {}

/// A node of a list.
pub trait LinkedList: private::LinkedList {
    fn get_next(&self) -> Option<Ptr<Self>> {
        self.list_links().next
    }

    fn get_prev(&self) -> Option<Ptr<Self>> {
        self.list_links().prev
    }

    /// The object whose list this node is in, if any.
    fn get_container(&self) -> Option<Ptr<Self::ContainerType>> {
        self.list_links().container
    }
}

impl<T: private::LinkedList> LinkedList for T {}

pub struct Iter<'a, T: LinkedList> {
    front: Option<Ptr<T>>,
    back: Option<Ptr<T>>,
    ctx: &'a Context,
}

impl<T: LinkedList> Iter<'_, T> {
    // Called when `front` and `back` meet.
    fn exhaust(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<T: LinkedList> Iterator for Iter<'_, T> {
    type Item = Ptr<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.front?;
        if self.back == Some(curr) {
            self.exhaust();
        } else {
            self.front = curr.deref(self.ctx).get_next();
        }
        Some(curr)
    }
}

impl<T: LinkedList> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let curr = self.back?;
        if self.front == Some(curr) {
            self.exhaust();
        } else {
            self.back = curr.deref(self.ctx).get_prev();
        }
        Some(curr)
    }
}

impl<T: LinkedList> Ptr<T> {
    /// Splice `self`, which must be unlinked, in between `prev` and `next` of `container`.
    /// A missing neighbour means `self` becomes that end of the list.
    fn splice(
        &self,
        ctx: &Context,
        container: Ptr<T::ContainerType>,
        prev: Option<Ptr<T>>,
        next: Option<Ptr<T>>,
    ) {
        assert!(
            !self.is_linked(ctx),
            "Cannot link a node that is already in a list"
        );
        match prev {
            Some(prev) => prev.deref_mut(ctx).list_links_mut().next = Some(*self),
            None => container.deref_mut(ctx).list_ends_mut().head = Some(*self),
        }
        match next {
            Some(next) => next.deref_mut(ctx).list_links_mut().prev = Some(*self),
            None => container.deref_mut(ctx).list_ends_mut().tail = Some(*self),
        }
        let mut node = self.deref_mut(ctx);
        let links = node.list_links_mut();
        links.prev = prev;
        links.next = next;
        links.container = Some(container);
    }

    /// Container of `mark`, and the neighbour of `mark` that `forward` selects.
    fn neighbourhood(
        mark: Ptr<T>,
        ctx: &Context,
        forward: bool,
    ) -> (Ptr<T::ContainerType>, Option<Ptr<T>>) {
        let mark = mark.deref(ctx);
        let container = mark
            .get_container()
            .expect("Cannot link relative to a node that is not in a list");
        let neighbour = if forward { mark.get_next() } else { mark.get_prev() };
        (container, neighbour)
    }

    /// Link `self` right after `mark`.
    pub fn insert_after(&self, ctx: &Context, mark: Ptr<T>) {
        let (container, next) = Self::neighbourhood(mark, ctx, true);
        self.splice(ctx, container, Some(mark), next);
    }

    /// Link `self` right before `mark`.
    pub fn insert_before(&self, ctx: &Context, mark: Ptr<T>) {
        let (container, prev) = Self::neighbourhood(mark, ctx, false);
        self.splice(ctx, container, prev, Some(mark));
    }

    /// Link `self` as the first node of `container`.
    pub fn insert_at_front(&self, container: Ptr<T::ContainerType>, ctx: &Context) {
        let head = container.deref(ctx).get_head();
        self.splice(ctx, container, None, head);
    }

    /// Link `self` as the last node of `container`.
    pub fn insert_at_back(&self, container: Ptr<T::ContainerType>, ctx: &Context) {
        let tail = container.deref(ctx).get_tail();
        self.splice(ctx, container, tail, None);
    }

    pub fn is_linked(&self, ctx: &Context) -> bool {
        self.deref(ctx).get_container().is_some()
    }

    /// Take `self` out of its list.
    ///
    /// # Panics
    /// If `self` isn't in a list.
    pub fn unlink(&self, ctx: &Context) {
        let links = std::mem::take(self.deref_mut(ctx).list_links_mut());
        let container = links
            .container
            .expect("Cannot unlink a node that is not in a list");
        match links.next {
            Some(next) => next.deref_mut(ctx).list_links_mut().prev = links.prev,
            None => container.deref_mut(ctx).list_ends_mut().tail = links.prev,
        }
        match links.prev {
            Some(prev) => prev.deref_mut(ctx).list_links_mut().next = links.next,
            None => container.deref_mut(ctx).list_ends_mut().head = links.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        basic_block::BasicBlock,
        context::Context,
        linked_list::{ContainsLinkedList, LinkedList},
    };

    #[test]
    fn blocks_in_region() {
        let ctx = &mut Context::new();
        let op = crate::operation::Operation::new(
            ctx,
            crate::op::OpId {
                dialect: crate::dialect::DialectName::new("test"),
                name: crate::op::OpName::new("holder"),
            },
            vec![],
            vec![],
            1,
        );
        let region = op.deref(ctx).get_region(0).unwrap();
        let [b1, b2, b3] = [(); 3].map(|_| BasicBlock::new(ctx, None, vec![]));

        b2.insert_at_back(region, ctx);
        b1.insert_before(ctx, b2);
        b3.insert_after(ctx, b2);
        let order: Vec<_> = region.deref(ctx).iter(ctx).collect();
        assert!(order == vec![b1, b2, b3]);

        b2.unlink(ctx);
        assert!(!b2.is_linked(ctx));
        assert!(b1.deref(ctx).get_next() == Some(b3));
        assert!(b3.deref(ctx).get_prev() == Some(b1));

        b3.unlink(ctx);
        b1.unlink(ctx);
        assert!(region.deref(ctx).get_head().is_none() && region.deref(ctx).get_tail().is_none());

        b3.insert_at_front(region, ctx);
        b1.insert_at_front(region, ctx);
        let order: Vec<_> = region.deref(ctx).iter(ctx).rev().collect();
        assert!(order == vec![b3, b1]);
    }
}
