use tantivy::schema::{
    IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED, STRING,
};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();
    let _doc_id_field = schema_builder.add_u64_field("doc_id", INDEXED | STORED);
    let _source_field = schema_builder.add_text_field("source", STRING | STORED);
    let _sequence_field = schema_builder.add_u64_field("sequence", STORED);
    let content_field_indexing = TextFieldIndexing::default()
        .set_tokenizer("text_with_stopwords")
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let content_options = TextOptions::default().set_indexing_options(content_field_indexing);
    let _content_field = schema_builder.add_text_field("content", content_options);
    schema_builder.build()
}

pub fn register_tokenizer(index: &Index) {
    let stop_words = vec![
        "a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
    ];
    let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
        .build();
    index.tokenizers().register("text_with_stopwords", tokenizer);
}
