mod object;

mod operations;


// Helper and pipeline tests
mod alias;
