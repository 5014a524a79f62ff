mod games;
mod helpers;
mod mocks;
mod pricing;
