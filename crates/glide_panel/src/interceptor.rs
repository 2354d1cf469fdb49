//! Gesture arbitration interceptors
//!
//! Before the panel answers a recognizer-arbitration query it asks each
//! interceptor in order. The first one returning [`Interception::Handled`]
//! decides; if all pass through, the panel's own rules apply.

use glide_core::GestureKind;

/// Answer of an interceptor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interception {
    Handled(bool),
    PassThrough,
}

/// An arbitration query about the panel pan gesture and another gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArbitrationQuery {
    /// May both gestures be recognized at the same time
    Simultaneous,
    /// Must the panel pan fail before the other gesture begins
    RequiredToFailBy,
    /// Must the other gesture fail before the panel pan begins
    RequireFailureOf,
}

pub trait GestureInterceptor {
    fn intercept(&mut self, query: ArbitrationQuery, other: GestureKind) -> Interception;
}

/// Intercept with a closure
impl<F> GestureInterceptor for F
where
    F: FnMut(ArbitrationQuery, GestureKind) -> Interception,
{
    fn intercept(&mut self, query: ArbitrationQuery, other: GestureKind) -> Interception {
        self(query, other)
    }
}

/// Consult `chain` in order
pub(crate) fn consult(
    chain: &mut [Box<dyn GestureInterceptor>],
    query: ArbitrationQuery,
    other: GestureKind,
) -> Option<bool> {
    chain.iter_mut().find_map(|interceptor| match interceptor.intercept(query, other) {
        Interception::Handled(result) => Some(result),
        Interception::PassThrough => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_handled_wins() {
        let mut chain: Vec<Box<dyn GestureInterceptor>> = vec![
            Box::new(|_: ArbitrationQuery, _: GestureKind| Interception::PassThrough),
            Box::new(|query: ArbitrationQuery, _: GestureKind| {
                if query == ArbitrationQuery::Simultaneous {
                    Interception::Handled(false)
                } else {
                    Interception::PassThrough
                }
            }),
            Box::new(|_: ArbitrationQuery, _: GestureKind| Interception::Handled(true)),
        ];
        assert_eq!(
            consult(&mut chain, ArbitrationQuery::Simultaneous, GestureKind::Discrete),
            Some(false)
        );
        assert_eq!(
            consult(&mut chain, ArbitrationQuery::RequireFailureOf, GestureKind::Discrete),
            Some(true)
        );
    }

    #[test]
    fn test_empty_chain_passes_through() {
        let mut chain: Vec<Box<dyn GestureInterceptor>> = Vec::new();
        assert_eq!(
            consult(&mut chain, ArbitrationQuery::RequiredToFailBy, GestureKind::Continuous),
            None
        );
    }
}
