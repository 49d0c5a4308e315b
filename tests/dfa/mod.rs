mod escape;
mod populate;
