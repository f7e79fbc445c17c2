//! Code generation for the `Record` derive
//!
//! Generated code names items as `proc_access::...`, so the deriving crate
//! must depend on proc-access (directly or through the procbind facade).

use crate::parsing::{FieldInfo, RecordInfo};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub fn generate_proc_input_impl(input: &DeriveInput, field_info: &FieldInfo) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let values = field_info.columns.iter().map(|field| {
        let ident = &field.ident;
        let column = &field.column;
        quote! {
            proc_access::FieldValue::new(
                #column,
                proc_access::ProcValue::from(::std::clone::Clone::clone(&self.#ident)),
            )
        }
    });

    quote! {
        impl #impl_generics proc_access::ProcInput for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<proc_access::FieldValue> {
                ::std::vec![#(#values),*]
            }
        }
    }
}

pub fn generate_proc_output_impl(input: &DeriveInput, field_info: &FieldInfo) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let reads = field_info.columns.iter().map(|field| {
        let ident = &field.ident;
        let column = &field.column;
        quote! {
            #ident: proc_access::marshal::read_column(row, #column)?
        }
    });

    let defaults = field_info.skipped.iter().map(|ident| {
        quote! {
            #ident: ::std::default::Default::default()
        }
    });

    quote! {
        impl #impl_generics proc_access::ProcOutput for #name #ty_generics #where_clause {
            fn materialize(
                row: &dyn proc_access::RowView,
            ) -> ::std::result::Result<Self, proc_access::FieldMappingError> {
                ::std::result::Result::Ok(Self {
                    #(#reads,)*
                    #(#defaults,)*
                })
            }
        }
    }
}

pub fn generate_record_impl(input: &DeriveInput, record_info: &RecordInfo, field_info: &FieldInfo) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let record_name = &record_info.name;
    let columns = field_info.columns.iter().map(|field| &field.column);

    quote! {
        impl #impl_generics proc_access::Record for #name #ty_generics #where_clause {
            fn descriptor() -> proc_access::TypeDescriptor {
                proc_access::TypeDescriptor::new(#record_name)
            }

            fn field_names() -> &'static [&'static str] {
                &[#(#columns),*]
            }
        }
    }
}
