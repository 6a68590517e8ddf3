//! Recording the steps taken by the rewriting algorithms.
//!
//! The denester reports every radical it rewrites, and why, through a [`StepCollector`]. Pass
//! `&mut Vec<Step>` to keep the steps, or `&mut ()` to drop them.

/// Receives the steps of an algorithm as they are taken.
pub trait StepCollector<S> {
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

impl<S, C: StepCollector<S> + ?Sized> StepCollector<S> for &mut C {
    #[inline]
    fn push(&mut self, step: S) {
        (**self).push(step);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn count_to<C: StepCollector<u32>>(n: u32, mut steps: C) {
        for i in 1..=n {
            steps.push(i);
        }
    }

    #[test]
    fn collectors() {
        let mut steps = Vec::new();
        count_to(3, &mut steps);
        assert_eq!(steps, vec![1, 2, 3]);

        // forwarding through a reborrow keeps the steps in the original collector
        let mut outer = &mut steps;
        count_to(1, &mut outer);
        assert_eq!(steps.len(), 4);

        count_to(3, ());
    }
}
