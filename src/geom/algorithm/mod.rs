mod overlap;
mod proj;
