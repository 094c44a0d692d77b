//! Cross-module scenario tests
//!
//! `fixtures` builds a small level laid out left to right along the floor:
//! three coins, a key, a lock and water at the right edge. Two rows of coins
//! float near the ceiling, enough for the power-up.


mod restart;
