/// Number of cells on one row of a maze (the x extent).
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);

/// Number of rows in a maze (the y extent).
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);
