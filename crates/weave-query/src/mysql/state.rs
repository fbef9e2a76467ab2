//! Phantom types for insert builder states.
//!
//! These zero-sized types decide which body methods an [`super::InsertQuery`] exposes, so a
//! `VALUES` body and a `SET` body cannot end up in the same statement.

/// Initial state: no body chosen yet.
#[derive(Debug, Clone, Copy)]
pub struct Empty;

/// State after at least one `.values()` call.
#[derive(Debug, Clone, Copy)]
pub struct Values;

/// State after at least one `.set()` call.
#[derive(Debug, Clone, Copy)]
pub struct Assignments;

/// State after `.select()`.
#[derive(Debug, Clone, Copy)]
pub struct FromSelect;

/// States that accept a column list.
pub trait ColumnList {}

impl ColumnList for Empty {}
impl ColumnList for Values {}
impl ColumnList for FromSelect {}

/// States that have a body and can be rendered.
pub trait Complete {}

impl Complete for Values {}
impl Complete for Assignments {}
impl Complete for FromSelect {}
