//! The chain-driver contract shared by all samplers in the crate.

use crate::vector::Vector;
use ndarray::Array2;
use num_traits::Float;

pub trait MarkovChain<S> {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> &S;

    /// Returns the current state without stepping.
    fn current_state(&self) -> &S;
}

/// Runs `chain` for `n_steps` iterations and collects every state into a
/// `[n_steps, dim]` array.
pub fn run_chain<T, M>(chain: &mut M, n_steps: usize) -> Array2<T>
where
    T: Float,
    M: MarkovChain<Vector<T>>,
{
    let dim = chain.current_state().len();
    let mut out = Array2::from_elem((n_steps, dim), T::zero());

    for i in 0..n_steps {
        let state = chain.step();
        out.row_mut(i).assign(&state.view());
    }

    out
}
