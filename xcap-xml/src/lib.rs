// utils
pub mod error;
pub mod xml;

// xcap server capabilities, RFC4825
pub mod capsdecoder;
pub mod capsencoder;
pub mod capstypes;

// xcap conflict reports, RFC4825
pub mod errdecoder;
pub mod errencoder;
pub mod errtypes;

// resource lists, RFC4826
pub mod rldecoder;
pub mod rlencoder;
pub mod rltypes;

// common policy + presence authorization rules, RFC4745 + RFC5025
pub mod policydecoder;
pub mod policyencoder;
pub mod policytypes;

// OMA presence content (status icon)
pub mod contentdecoder;
pub mod contentencoder;
pub mod contenttypes;
