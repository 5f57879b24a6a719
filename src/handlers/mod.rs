/*!
 * Message handlers module
 *
 * Handlers are grouped by domain; each one drives the session and prints
 * what the operator asked to see.
 */

mod adapters;
mod attack;
mod general;
mod scan;
